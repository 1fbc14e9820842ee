//! Connectivity Manager (§4.3, L3): owns the double-TLV Device framing and
//! the separate Uhost MQTT connection, multiplexing both into a single
//! inbound fan-in queue and demultiplexing outbound traffic by destination.

/// The double-TLV Device framing (the outer `DataType` envelope plus the
/// inner per-layer TLV) shared by the Device-boundary loops.
pub mod framing;
/// The `MqttPublisher` trait and its `rumqttc`-backed implementation.
pub mod mqtt_transport;
/// `UtimConnection`: the Uhost MQTT connection, its status, and the
/// ack/retry republisher.
pub mod uhost;

use crate::config::Config;
use crate::error::ConnectivityError;
use crate::queue::BoundedQueue;
use crate::routing::RoutedItem;
use crate::tag::{Address, DataType};
use mqtt_transport::{ConnManagerMqtt, MqttPublisher, RumqttcPublisher};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use uhost::{ManagerConnectionStatus, UtimConnection};

/// The byte-framed duplex pair to the host-process or UART bridge (L0).
/// Owned externally; the Connectivity Manager only ever reads `rx` and
/// writes `tx`.
#[derive(Debug, Clone)]
pub struct Datalink {
    /// Frames bound for the Device.
    pub tx: BoundedQueue<Vec<u8>>,
    /// Frames received from the Device.
    pub rx: BoundedQueue<Vec<u8>>,
}

impl Datalink {
    /// Creates a fresh, empty datalink pair.
    pub fn new() -> Self {
        Self {
            tx: BoundedQueue::new(),
            rx: BoundedQueue::new(),
        }
    }
}

impl Default for Datalink {
    fn default() -> Self {
        Self::new()
    }
}

const LOOP_POLL: Duration = Duration::from_millis(200);

/// L3: owns the Device datalink framing and the Uhost connection, and runs
/// the `inbound_loop`/`outbound_loop` worker tasks described in §4.3.
pub struct ConnectivityManager {
    datalink: Datalink,
    uhost: parking_lot::Mutex<Arc<UtimConnection>>,
    inbound: BoundedQueue<RoutedItem>,
    outbound: BoundedQueue<(DataType, Vec<u8>)>,
    run: Arc<AtomicBool>,
}

impl ConnectivityManager {
    /// Builds a manager over the given datalink, with the Uhost connection
    /// left unestablished until [`ConnectivityManager::run_uhost_connection`]
    /// is called.
    pub fn new(datalink: Datalink, uhost_topic: String) -> Self {
        let placeholder = ConnManagerMqtt::new(Arc::new(NullPublisher), Vec::new());
        Self {
            datalink,
            uhost: parking_lot::Mutex::new(Arc::new(UtimConnection::new(placeholder, uhost_topic))),
            inbound: BoundedQueue::new(),
            outbound: BoundedQueue::new(),
            run: Arc::new(AtomicBool::new(true)),
        }
    }

    fn uhost(&self) -> Arc<UtimConnection> {
        self.uhost.lock().clone()
    }

    /// Establishes the Uhost MQTT connection per `config` and returns its
    /// resulting status. A non-[`ManagerConnectionStatus::Success`] result
    /// is a connection error that propagates out of the `Utim` constructor
    /// (§7 propagation policy).
    pub fn run_uhost_connection(&self, config: &Config) -> Result<ManagerConnectionStatus, ConnectivityError> {
        if config.mqtt.host.is_empty() {
            self.uhost().set_status(ManagerConnectionStatus::InvalidConfig);
            return Ok(ManagerConnectionStatus::InvalidConfig);
        }

        let mut mqttoptions = rumqttc::MqttOptions::new(
            "utim",
            config.mqtt.host.clone(),
            1883,
        );
        mqttoptions.set_credentials(config.mqtt.user.clone(), config.mqtt.pass.clone());
        mqttoptions.set_keep_alive(Duration::from_secs(config.mqtt.reconnect_time.max(5)));

        let (client, mut connection) = rumqttc::Client::new(mqttoptions, 128);
        let uhost_name = config
            .uhost_name_bytes()
            .map_err(|_| ConnectivityError::ConnectivityConfigError)?;
        let topic = String::from_utf8_lossy(&uhost_name).into_owned();
        client
            .subscribe(&topic, rumqttc::QoS::AtLeastOnce)
            .map_err(|_| ConnectivityError::ConnectivityHostError)?;

        let publisher: Arc<dyn MqttPublisher> = Arc::new(RumqttcPublisher::new(client));
        let utim_name = config
            .utim_name_bytes()
            .map_err(|_| ConnectivityError::ConnectivityConfigError)?;
        let inner = ConnManagerMqtt::new(publisher, utim_name);
        let uhost = Arc::new(UtimConnection::new(inner, topic));
        uhost.set_status(ManagerConnectionStatus::NotInitialized);

        let run = self.run.clone();
        let poll_uhost = uhost.clone();
        std::thread::spawn(move || {
            while run.load(Ordering::Acquire) {
                match connection.recv_timeout(LOOP_POLL) {
                    Ok(Ok(rumqttc::Event::Incoming(rumqttc::Packet::ConnAck(_)))) => {
                        poll_uhost.set_status(ManagerConnectionStatus::Success);
                    }
                    Ok(Ok(rumqttc::Event::Incoming(rumqttc::Packet::Publish(publish)))) => {
                        poll_uhost.on_message(&publish.payload);
                    }
                    Ok(Err(_)) => {
                        poll_uhost.set_status(ManagerConnectionStatus::UhostConnectionError);
                    }
                    _ => {}
                }
            }
        });

        *self.uhost.lock() = uhost.clone();

        // Give the event loop a moment to observe ConnAck before reporting.
        std::thread::sleep(Duration::from_millis(50));
        Ok(uhost.status())
    }

    /// Enqueues `(destination, body)` for the outbound loop to route.
    pub fn send(&self, destination: DataType, body: Vec<u8>) -> bool {
        self.outbound.try_put((destination, body)).is_ok()
    }

    /// Injects a synthetic inbound item directly onto the fan-in queue,
    /// bypassing the datalink — the seam the launcher uses to deliver a
    /// synthetic `NETWORK_READY` stimulus (§6).
    pub fn inject(&self, item: RoutedItem) -> bool {
        self.inbound.try_put(item).is_ok()
    }

    /// Non-blocking pull of the next fanned-in inbound item.
    pub fn receive(&self) -> Option<RoutedItem> {
        self.inbound.try_get().ok()
    }

    /// Blocking pull (bounded by `timeout`) of the next fanned-in inbound
    /// item, used by the Processor loop to also observe the cancellation
    /// flag between items (§5).
    pub fn receive_timeout(&self, timeout: Duration) -> Option<RoutedItem> {
        self.inbound.get_timeout(timeout).ok()
    }

    /// Starts `inbound_loop` and `outbound_loop` as independent OS threads.
    pub fn start(self: &Arc<Self>) {
        let inbound_handle = self.clone();
        std::thread::spawn(move || inbound_handle.inbound_loop());
        let outbound_handle = self.clone();
        std::thread::spawn(move || outbound_handle.outbound_loop());
    }

    fn inbound_loop(&self) {
        while self.run.load(Ordering::Acquire) {
            if let Ok(raw) = self.datalink.rx.get_timeout(LOOP_POLL) {
                match framing::decode_frame(&raw) {
                    Some((DataType::Device, payload)) => {
                        let item = RoutedItem {
                            address: Address::Device,
                            body: payload,
                        };
                        while self.inbound.try_put(item.clone()).is_err() && self.run.load(Ordering::Acquire)
                        {
                            std::thread::yield_now();
                        }
                    }
                    Some(_) => log::warn!("datalink frame not addressed to device link, dropping"),
                    None => log::warn!("malformed datalink frame, dropping"),
                }
            }
            if let Some((address, body)) = self.uhost().receive() {
                let _ = self.inbound.try_put(RoutedItem { address, body });
            }
        }
    }

    fn outbound_loop(&self) {
        while self.run.load(Ordering::Acquire) {
            if let Ok((dt, body)) = self.outbound.get_timeout(LOOP_POLL) {
                match dt {
                    DataType::Device => {
                        let raw = framing::encode_frame(DataType::Device, &body);
                        while self.datalink.tx.try_put(raw.clone()).is_err()
                            && self.run.load(Ordering::Acquire)
                        {
                            std::thread::yield_now();
                        }
                    }
                    DataType::Uhost => {
                        let uhost = self.uhost();
                        if uhost.status() == ManagerConnectionStatus::Success {
                            uhost.send(&body);
                        }
                    }
                    DataType::Platform => {
                        // Extension point: Platform egress is out of core
                        // (§4.3), left unimplemented here on purpose.
                    }
                }
            }
        }
    }

    /// Idempotently stops both loops and the Uhost ack/retry republishers.
    pub fn stop(&self) {
        self.run.store(false, Ordering::Release);
        self.uhost().stop();
    }
}

#[cfg(test)]
impl ConnectivityManager {
    /// Test-only peek at the outbound queue, bypassing the outbound loop
    /// (which is never started in unit tests that exercise the Processor in
    /// isolation).
    pub fn take_outbound_for_test(&self) -> Option<(DataType, Vec<u8>)> {
        self.outbound.try_get().ok()
    }
}

struct NullPublisher;
impl MqttPublisher for NullPublisher {
    fn publish(&self, _topic: &str, _payload: &[u8]) -> Result<(), crate::error::UhostConnectionError> {
        Err(crate::error::UhostConnectionError::NotConnected)
    }
}
