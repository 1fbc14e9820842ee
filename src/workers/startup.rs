//! `device_worker_startup` (§4.8.1): kicks off the SRP-6a exchange when the
//! Device signals the network link is up.

use crate::context::{SrpStep, UtimContext};
use crate::routing::ProcessItem;
use crate::srp_client::SrpSession;
use crate::tag::{Address, Status, Ucommand};
use crate::tlv;

/// Handles `INBOUND.NETWORK_READY`.
///
/// Precondition: `source == Device`, `destination == Utim`, `status ==
/// Process`, `ctx.srp_step == None`. On any mismatch the item is finalized
/// without starting an exchange.
pub fn device_worker_startup(ctx: &mut UtimContext, item: ProcessItem) -> ProcessItem {
    if item.source != Address::Device
        || item.destination != Address::Utim
        || item.status != Status::Process
        || ctx.srp_step != SrpStep::None
    {
        return item.finalize();
    }

    let (session, _username, a_pub) = SrpSession::start_authentication(&ctx.utim_name);
    ctx.srp_client = Some(session);
    ctx.srp_step = SrpStep::AwaitingChallenge;

    let hello = tlv::encode(Ucommand::Hello as u8, &a_pub);
    ProcessItem {
        source: Address::Utim,
        destination: Address::Uhost,
        status: Status::Process,
        body: Some(hello),
    }
}
