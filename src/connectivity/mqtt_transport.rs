//! `ConnManagerMQTT` (§4.4): the at-least-once ack/retry wrapper sitting
//! directly on top of the raw MQTT client.
//!
//! The MQTT client library itself (subscribe/publish/callback) is out of
//! scope per `spec.md` §1; [`MqttPublisher`] is the seam this module
//! consumes it through, implemented for real use by [`RumqttcPublisher`]
//! (wrapping `rumqttc`) and by a recording mock in tests — the same pattern
//! the teacher uses for `network::application::mqtt::client::Client` sitting
//! on top of a raw `Connection`.

use crate::error::UhostConnectionError;
use parking_lot::Mutex;
use rand::Rng;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

const SENDER_DELIMITER: u8 = 0x20;
const KIND_DATA: u8 = 0x01;
const KIND_ACK: u8 = 0x02;
const FIRST_RETRY_DELAY: Duration = Duration::from_secs(10);
const RETRY_INTERVAL: Duration = Duration::from_secs(5);

/// The narrow publish surface this layer needs from an MQTT client.
pub trait MqttPublisher: Send + Sync + 'static {
    /// Publishes `payload` on `topic`.
    fn publish(&self, topic: &str, payload: &[u8]) -> Result<(), UhostConnectionError>;
}

/// Real publisher backed by `rumqttc`'s blocking client.
pub struct RumqttcPublisher {
    client: rumqttc::Client,
}

impl RumqttcPublisher {
    /// Wraps an already-connected `rumqttc::Client`.
    pub fn new(client: rumqttc::Client) -> Self {
        Self { client }
    }
}

impl MqttPublisher for RumqttcPublisher {
    fn publish(&self, topic: &str, payload: &[u8]) -> Result<(), UhostConnectionError> {
        self.client
            .publish(topic, rumqttc::QoS::AtLeastOnce, false, payload.to_vec())
            .map_err(|_| UhostConnectionError::NotConnected)
    }
}

/// A published-but-not-yet-acked message (§3 `SentMessageEntry`).
#[derive(Debug, Clone)]
struct SentMessageEntry {
    sender: Vec<u8>,
    destination: String,
    payload: Vec<u8>,
}

/// The ack/retry wrapper. Clone is cheap and shares the same outstanding
/// message table and run flag, matching how the source passes one instance
/// to multiple tasks.
#[derive(Clone)]
pub struct ConnManagerMqtt {
    publisher: Arc<dyn MqttPublisher>,
    sender: Vec<u8>,
    message_number: Arc<AtomicU32>,
    sent_messages: Arc<Mutex<HashMap<u16, SentMessageEntry>>>,
    run: Arc<AtomicBool>,
}

impl std::fmt::Debug for ConnManagerMqtt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnManagerMqtt")
            .field("sender", &self.sender)
            .field("outstanding", &self.sent_messages.lock().len())
            .finish()
    }
}

impl ConnManagerMqtt {
    /// Builds a new wrapper. `sender` is this agent's identity, prefixed
    /// onto every outbound frame. The initial message id is randomized
    /// (`SPEC_FULL.md` B) to avoid trivial collisions after a restart.
    pub fn new(publisher: Arc<dyn MqttPublisher>, sender: Vec<u8>) -> Self {
        let initial_id: u16 = rand::thread_rng().gen_range(0..=65535);
        Self {
            publisher,
            sender,
            message_number: Arc::new(AtomicU32::new(initial_id as u32)),
            sent_messages: Arc::new(Mutex::new(HashMap::new())),
            run: Arc::new(AtomicBool::new(true)),
        }
    }

    fn next_id(&self) -> u16 {
        (self.message_number.fetch_add(1, Ordering::Relaxed) % 65536) as u16
    }

    /// Publishes `message` to `destination`, recording it in the
    /// outstanding-ack table and scheduling a republisher (first at 10s,
    /// then every 5s until acked or `stop()`).
    pub fn publish(&self, destination: &str, message: &[u8]) -> Result<u16, UhostConnectionError> {
        if self.sender.is_empty() || destination.is_empty() {
            return Err(UhostConnectionError::ExchangeError);
        }
        let id = self.next_id();
        let entry = SentMessageEntry {
            sender: self.sender.clone(),
            destination: destination.to_string(),
            payload: message.to_vec(),
        };
        self.sent_messages.lock().insert(id, entry.clone());

        let frame = Self::frame_data(&entry.sender, id, &entry.payload);
        self.publisher.publish(&entry.destination, &frame)?;

        self.spawn_republisher(id);
        Ok(id)
    }

    fn spawn_republisher(&self, id: u16) {
        let this = self.clone();
        std::thread::spawn(move || {
            std::thread::sleep(FIRST_RETRY_DELAY);
            loop {
                if !this.run.load(Ordering::Acquire) {
                    return;
                }
                let entry = {
                    let table = this.sent_messages.lock();
                    table.get(&id).cloned()
                };
                let Some(entry) = entry else {
                    // Acked (or never existed) — per O4 this check-then-act
                    // must tolerate the ack racing with this wakeup.
                    return;
                };
                let frame = Self::frame_data(&entry.sender, id, &entry.payload);
                let _ = this.publisher.publish(&entry.destination, &frame);
                std::thread::sleep(RETRY_INTERVAL);
            }
        });
    }

    /// Handles one inbound MQTT payload for this wrapper's topic. Returns
    /// the delivered application message body, if the frame was a data
    /// frame (publishing the matching ack as a side effect). Returns `None`
    /// for ack frames (after removing the id from the outstanding table) or
    /// malformed input (logged and dropped by the caller).
    pub fn handle_inbound(&self, payload: &[u8]) -> Option<Vec<u8>> {
        let split = payload.iter().position(|&b| b == SENDER_DELIMITER)?;
        let sender = &payload[..split];
        let rest = &payload[split + 1..];
        if rest.len() < 3 {
            log::debug!("uhost inbound frame shorter than kind+id header, dropping");
            return None;
        }
        let kind = rest[0];
        let id = u16::from_be_bytes([rest[1], rest[2]]);
        match kind {
            KIND_DATA => {
                let ack = Self::frame_ack(&self.sender, id);
                let topic = String::from_utf8_lossy(sender).into_owned();
                let _ = self.publisher.publish(&topic, &ack);
                Some(rest[3..].to_vec())
            }
            KIND_ACK => {
                // Idempotent: removing an absent id is a no-op (P5).
                self.sent_messages.lock().remove(&id);
                None
            }
            _ => {
                log::debug!("unrecognized uhost frame kind {kind:#x}, dropping");
                None
            }
        }
    }

    /// Stops all republisher tasks. Idempotent; subsequent calls are no-ops.
    pub fn stop(&self) {
        self.run.store(false, Ordering::Release);
    }

    /// Number of messages currently awaiting an ack (for tests/diagnostics).
    pub fn outstanding_count(&self) -> usize {
        self.sent_messages.lock().len()
    }

    fn frame_data(sender: &[u8], id: u16, message: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(sender.len() + 1 + 1 + 2 + message.len());
        out.extend_from_slice(sender);
        out.push(SENDER_DELIMITER);
        out.push(KIND_DATA);
        out.extend_from_slice(&id.to_be_bytes());
        out.extend_from_slice(message);
        out
    }

    fn frame_ack(sender: &[u8], id: u16) -> Vec<u8> {
        let mut out = Vec::with_capacity(sender.len() + 1 + 1 + 2);
        out.extend_from_slice(sender);
        out.push(SENDER_DELIMITER);
        out.push(KIND_ACK);
        out.extend_from_slice(&id.to_be_bytes());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    #[derive(Default)]
    struct RecordingPublisher {
        sent: StdMutex<Vec<(String, Vec<u8>)>>,
    }

    impl MqttPublisher for RecordingPublisher {
        fn publish(&self, topic: &str, payload: &[u8]) -> Result<(), UhostConnectionError> {
            self.sent.lock().unwrap().push((topic.to_string(), payload.to_vec()));
            Ok(())
        }
    }

    #[test]
    fn publish_records_outstanding_and_frames_correctly() {
        let publisher = Arc::new(RecordingPublisher::default());
        let mgr = ConnManagerMqtt::new(publisher.clone(), b"utim".to_vec());
        let id = mgr.publish("d1", b"hello").unwrap();
        assert_eq!(mgr.outstanding_count(), 1);

        let sent = publisher.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        let (topic, frame) = &sent[0];
        assert_eq!(topic, "d1");
        assert_eq!(&frame[..4], b"utim");
        assert_eq!(frame[4], SENDER_DELIMITER);
        assert_eq!(frame[5], KIND_DATA);
        assert_eq!(u16::from_be_bytes([frame[6], frame[7]]), id);
        assert_eq!(&frame[8..], b"hello");
    }

    #[test]
    fn ack_removes_outstanding_entry_idempotently() {
        let publisher = Arc::new(RecordingPublisher::default());
        let mgr = ConnManagerMqtt::new(publisher, b"utim".to_vec());
        let id = mgr.publish("d1", b"hello").unwrap();

        let ack = ConnManagerMqtt::frame_ack(b"d1", id);
        assert!(mgr.handle_inbound(&ack).is_none());
        assert_eq!(mgr.outstanding_count(), 0);

        // Second ack for the same id is a no-op (P5, I4).
        assert!(mgr.handle_inbound(&ack).is_none());
        assert_eq!(mgr.outstanding_count(), 0);
    }

    #[test]
    fn data_frame_triggers_ack_and_returns_payload() {
        let publisher = Arc::new(RecordingPublisher::default());
        let mgr = ConnManagerMqtt::new(publisher.clone(), b"utim".to_vec());

        let data = ConnManagerMqtt::frame_data(b"peer", 42, b"ping");
        let delivered = mgr.handle_inbound(&data).unwrap();
        assert_eq!(delivered, b"ping");

        let sent = publisher.sent.lock().unwrap();
        let (topic, ack_frame) = sent.last().unwrap();
        assert_eq!(topic, "peer");
        assert_eq!(ack_frame[5], KIND_ACK);
        assert_eq!(u16::from_be_bytes([ack_frame[6], ack_frame[7]]), 42);
    }

    #[test]
    fn short_inner_payload_is_dropped() {
        let publisher = Arc::new(RecordingPublisher::default());
        let mgr = ConnManagerMqtt::new(publisher, b"utim".to_vec());
        let mut malformed = b"peer".to_vec();
        malformed.push(SENDER_DELIMITER);
        malformed.extend_from_slice(&[0x01, 0x00]); // only 2 bytes after delimiter
        assert!(mgr.handle_inbound(&malformed).is_none());
    }
}
