//! L6 Workers (§4.8): pure `(UtimContext, ProcessItem) -> ProcessItem`
//! functions, one module per normative protocol step. Each function name
//! mirrors the source's `utim_worker_*`/`device_worker_*` naming.

/// `utim_worker_authentic` (§4.8.4): delivers the session key to the Device.
pub mod authentic;
/// `utim_worker_connection_string` (§4.8.5): selects and records the
/// Platform adaptor.
pub mod connection_string;
/// `utim_worker_die` (§4.8.9): tears down the context and finalizes.
pub mod die;
/// `utim_worker_error` (§4.8.8): logs and finalizes on an inbound error tag.
pub mod error;
/// `device_worker_forward`: routes a Device payload on to Platform unchanged.
pub mod forward;
/// `utim_worker_init` (§4.8.3): verifies the server's HAMK and completes the
/// SRP-6a exchange.
pub mod init;
/// `utim_worker_keepalive` (§4.8.7): answers a keepalive probe.
pub mod keepalive;
/// `utim_worker_platform_verify` (§4.8.6): relays a platform data
/// verification request to Platform.
pub mod platform_verify;
/// `encrypt_and_sign` (§4.8.10): the Uhost egress crypto step.
pub mod secure;
/// `device_worker_startup` (§4.8.1): starts SRP-6a on `NETWORK_READY`.
pub mod startup;
/// `utim_worker_try` (§4.8.2): processes the server's SRP-6a challenge.
pub mod try_challenge;
/// `unsign_and_decrypt` (§4.8.11): the Uhost ingress crypto step.
pub mod unsecure;

use crate::tag::Ucommand;
use crate::tlv;

/// Builds a `UCOMMAND.ERROR` body carrying a short diagnostic string, the
/// shape every worker emits on a recoverable failure (§4.8.8).
pub(crate) fn error_body(reason: &str) -> Vec<u8> {
    tlv::encode(Ucommand::Error as u8, reason.as_bytes())
}
