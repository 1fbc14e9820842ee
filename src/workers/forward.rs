//! `device_worker_forward` (§4.8, `SPEC_FULL.md` B): the `INBOUND
//! .DATA_TO_PLATFORM` extension point.
//!
//! The source's `process_device.py` dispatches this tag to a worker module
//! whose body is not present anywhere in `original_source/` — confirmed
//! external, same as `spec.md` §1 marks Device-specific business logic out
//! of core. This keeps the seam as a free function with the right
//! signature: the minimal, obviously-correct behavior of looping the body
//! onward toward Platform unchanged, for a host application to replace.

use crate::context::UtimContext;
use crate::routing::ProcessItem;
use crate::tag::{Address, Status};

/// Handles `INBOUND.DATA_TO_PLATFORM` by routing the body onward to
/// Platform unchanged.
pub fn device_worker_forward(_ctx: &mut UtimContext, item: ProcessItem) -> ProcessItem {
    let Some(body) = item.body else {
        return ProcessItem {
            source: Address::Utim,
            destination: Address::Utim,
            status: Status::Finalized,
            body: None,
        };
    };
    ProcessItem {
        source: Address::Utim,
        destination: Address::Platform,
        status: Status::ToSend,
        body: Some(body),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, MqttConfig, Protocol};

    #[test]
    fn routes_body_to_platform_unchanged() {
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
            source: Address::Device,
            destination: Address::Utim,
            status: Status::Process,
            body: Some(vec![0x02, 1, 2, 3]),
        };
        let out = device_worker_forward(&mut context, item);
        assert_eq!(out.destination, Address::Platform);
        assert_eq!(out.status, Status::ToSend);
        assert_eq!(out.body, Some(vec![0x02, 1, 2, 3]));
    }
}
