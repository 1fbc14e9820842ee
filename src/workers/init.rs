//! `utim_worker_init` (§4.8.3): verifies the server's session-confirmation
//! proof and, on success, replies with a random trusted-nonce message.

use super::error_body;
use crate::context::{SrpStep, UtimContext};
use crate::routing::ProcessItem;
use crate::tag::{Address, Status, Ucommand};
use crate::tlv;
use rand::RngCore;

const TRUSTED_NONCE_LEN: usize = 32;

/// Handles `UCOMMAND.INIT`.
///
/// Precondition: `source == Uhost`, `destination == Utim`, `status ==
/// Process`, `ctx.srp_step == AwaitingConfirmation`.
pub fn utim_worker_init(ctx: &mut UtimContext, item: ProcessItem) -> ProcessItem {
    if item.source != Address::Uhost
        || item.destination != Address::Utim
        || item.status != Status::Process
        || ctx.srp_step != SrpStep::AwaitingConfirmation
    {
        return item.finalize();
    }

    let Some(body) = item.body.as_deref() else {
        return item.finalize();
    };
    let Ok(hamk) = tlv::decode(body) else {
        return item.finalize();
    };

    let verified = ctx
        .srp_client
        .as_mut()
        .map(|s| s.verify_session(&hamk.value).is_ok())
        .unwrap_or(false);

    let reply = if verified {
        ctx.session_key = ctx.srp_client.as_ref().and_then(|s| s.get_session_key());
        if ctx.session_key.is_some() {
            let mut nonce = vec![0u8; TRUSTED_NONCE_LEN];
            rand::thread_rng().fill_bytes(&mut nonce);
            tlv::encode(Ucommand::Trusted as u8, &nonce)
        } else {
            error_body("init processing")
        }
    } else {
        error_body("init processing")
    };

    ProcessItem {
        source: Address::Utim,
        destination: Address::Uhost,
        status: Status::Process,
        body: Some(reply),
    }
}
