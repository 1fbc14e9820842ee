//! `utim_worker_keepalive` (§4.8.7): replies to Uhost's liveness check.

use crate::context::UtimContext;
use crate::routing::ProcessItem;
use crate::tag::{Address, Status, Ucommand};
use crate::tlv;

/// Handles `UCOMMAND.KEEPALIVE` by emitting `UCOMMAND.KEEPALIVE_ANSWER`.
pub fn utim_worker_keepalive(_ctx: &mut UtimContext, _item: ProcessItem) -> ProcessItem {
    ProcessItem {
        source: Address::Utim,
        destination: Address::Uhost,
        status: Status::Process,
        body: Some(tlv::encode(Ucommand::KeepaliveAnswer as u8, &[])),
    }
}
