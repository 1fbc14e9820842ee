//! `utim_worker_encrypt` / `utim_worker_sign` (§4.8.10): egress crypto to
//! Uhost. Encrypt-then-MAC, exactly in that order (§9 "Sign ordering on
//! egress ... preserve exactly"). Sign is what flips `Process` to `ToSend`
//! on success (§4.7.2).

use crate::context::UtimContext;
use crate::crypto;
use crate::routing::ProcessItem;
use crate::tag::Status;

/// Applies [`crypto::encrypt`] then [`crypto::sign`] to `item.body` under
/// `ctx.session_key`. Encryption failure finalizes the item; success always
/// transitions to `ToSend` (HMAC signing itself never fails).
///
/// Runs unconditionally for every `Process`-status item addressed to Uhost,
/// key or no key: with no session key yet established, `crypto::encrypt`/
/// `crypto::sign` fall back to their NONE-mode passthrough, so pre-session
/// handshake traffic still carries the wire framing a real Uhost expects
/// (§4.7.2).
pub fn encrypt_and_sign(ctx: &mut UtimContext, item: ProcessItem) -> ProcessItem {
    let session_key = ctx.session_key.clone();
    let Some(body) = item.body.as_deref() else {
        return item.finalize();
    };
    let Ok(encrypted) = crypto::encrypt(session_key.as_deref(), body) else {
        return item.finalize();
    };
    let signed = crypto::sign(session_key.as_deref(), &encrypted);
    ProcessItem {
        status: Status::ToSend,
        body: Some(signed),
        ..item
    }
}
