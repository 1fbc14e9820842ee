//! `utim_worker_error` (§4.8.8): handles `UCOMMAND.ERROR` from either side —
//! logs and finalizes. This never propagates a Rust error; §7 classifies
//! in-band protocol errors as terminal, not exceptional.

use crate::context::UtimContext;
use crate::routing::ProcessItem;
use crate::tlv;

/// Handles `UCOMMAND.ERROR`.
pub fn utim_worker_error(_ctx: &mut UtimContext, item: ProcessItem) -> ProcessItem {
    if let Some(body) = item.body.as_deref() {
        if let Ok(tlv) = tlv::decode(body) {
            log::warn!("uhost reported protocol error: {}", String::from_utf8_lossy(&tlv.value));
        }
    }
    item.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, MqttConfig, Protocol};
    use crate::tag::{Address, Status, Ucommand};

    #[test]
    fn finalizes_on_error() {
        let mut context = UtimContext::new(
            Config {
                mqtt: MqttConfig { host: "h".into(), user: "u".into(), pass: "p".into(), reconnect_time: 5 },
                utim_name: "55544d".into(),
                master_key: "6b6579".into(),
                uhost_name: "556f".into(),
                protocol: Protocol::Mqtt,
            },
            b"UTIM".to_vec(),
            b"key".to_vec(),
        );
        let item = ProcessItem {
            source: Address::Uhost,
            destination: Address::Utim,
            status: Status::Process,
            body: Some(tlv::encode(Ucommand::Error as u8, b"bad proof")),
        };
        let out = utim_worker_error(&mut context, item);
        assert_eq!(out.status, Status::Finalized);
        assert!(out.body.is_none());
    }
}
