//! `utim_worker_die` (§4.8.9, `SPEC_FULL.md` B): tears down protocol state
//! and requests that the façade stop all loops.

use crate::context::UtimContext;
use crate::routing::ProcessItem;

/// Handles `UCOMMAND.DIE`.
pub fn utim_worker_die(ctx: &mut UtimContext, item: ProcessItem) -> ProcessItem {
    ctx.teardown();
    item.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, MqttConfig, Protocol};
    use crate::tag::{Address, Status};

    #[test]
    fn tears_down_context_and_finalizes() {
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
        context.session_key = Some(vec![1, 2, 3]);
        let item = ProcessItem {
            source: Address::Uhost,
            destination: Address::Utim,
            status: Status::Process,
            body: Some(vec![]),
        };
        let out = utim_worker_die(&mut context, item);
        assert_eq!(out.status, Status::Finalized);
        assert!(context.session_key.is_none());
        assert!(context.shutdown_requested());
    }
}
