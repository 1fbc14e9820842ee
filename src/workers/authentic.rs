//! `utim_worker_authentic` (§4.8.4): the protocol completion signal —
//! delivers the derived session key to the Device.

use crate::context::UtimContext;
use crate::routing::ProcessItem;
use crate::tag::{Address, Status};

/// Handles `UCOMMAND.AUTHENTIC`. Emits `(Utim, Device, ToSend,
/// session_key)`; finalizes (no key set yet, or called out of sequence).
pub fn utim_worker_authentic(ctx: &mut UtimContext, item: ProcessItem) -> ProcessItem {
    let Some(session_key) = ctx.session_key.clone() else {
        return item.finalize();
    };
    ProcessItem {
        source: Address::Utim,
        destination: Address::Device,
        status: Status::ToSend,
        body: Some(session_key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, MqttConfig, Protocol};

    fn ctx() -> UtimContext {
        UtimContext::new(
            Config {
                mqtt: MqttConfig { host: "h".into(), user: "u".into(), pass: "p".into(), reconnect_time: 5 },
                utim_name: "55544d".into(),
                master_key: "6b6579".into(),
                uhost_name: "556f".into(),
                protocol: Protocol::Mqtt,
            },
            b"UTIM".to_vec(),
            b"key".to_vec(),
        )
    }

    #[test]
    fn delivers_session_key_to_device() {
        let mut context = ctx();
        context.session_key = Some(vec![0xAA; 16]);
        let item = ProcessItem {
            source: Address::Uhost,
            destination: Address::Utim,
            status: Status::Process,
            body: Some(vec![]),
        };
        let out = utim_worker_authentic(&mut context, item);
        assert_eq!(out.source, Address::Utim);
        assert_eq!(out.destination, Address::Device);
        assert_eq!(out.status, Status::ToSend);
        assert_eq!(out.body, Some(vec![0xAA; 16]));
    }

    #[test]
    fn without_session_key_finalizes() {
        let mut context = ctx();
        let item = ProcessItem {
            source: Address::Uhost,
            destination: Address::Utim,
            status: Status::Process,
            body: Some(vec![]),
        };
        let out = utim_worker_authentic(&mut context, item);
        assert_eq!(out.status, Status::Finalized);
    }
}
