//! `utim_worker_platform_verify` (§4.8.6): relays a platform-bound data
//! verification request downstream to Platform.

use crate::context::UtimContext;
use crate::routing::ProcessItem;
use crate::tag::{Address, Status};
use crate::tlv;

/// Handles `UCOMMAND.TEST_PLATFORM_DATA`. The Platform side of this
/// exchange is out of core (§1); this worker only emits the routed item,
/// carrying the inner command payload as its body.
pub fn utim_worker_platform_verify(_ctx: &mut UtimContext, item: ProcessItem) -> ProcessItem {
    let Some(body) = item.body.as_deref() else {
        return item.finalize();
    };
    let Ok(command) = tlv::decode(body) else {
        return item.finalize();
    };
    ProcessItem {
        source: Address::Utim,
        destination: Address::Platform,
        status: Status::ToSend,
        body: Some(command.value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, MqttConfig, Protocol};

    #[test]
    fn relays_to_platform() {
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
        let body = tlv::encode(0x09, b"verify-me");
        let item = ProcessItem {
            source: Address::Uhost,
            destination: Address::Utim,
            status: Status::Process,
            body: Some(body),
        };
        let out = utim_worker_platform_verify(&mut context, item);
        assert_eq!(out.destination, Address::Platform);
        assert_eq!(out.status, Status::ToSend);
        assert_eq!(out.body.as_ref().unwrap(), b"verify-me");
    }
}
