//! Uhost subprocessor (§4.7.2).
//!
//! Wraps command dispatch with the ingress/egress crypto steps: unsign+
//! decrypt every `Process` item sourced from Uhost before dispatching on its
//! command tag, then encrypt+sign anything left addressed back to Uhost in
//! `Process` state.
//!
//! Both steps run unconditionally, key or no key. Before a session key is
//! established, `crypto::encrypt`/`crypto::sign` and their ingress
//! counterparts fall back to a NONE-mode passthrough, so pre-session
//! handshake traffic (`HELLO`/`TRY`/`CHECK`/`INIT`) still carries the
//! `CRYPTO.SIGNED(CRYPTO.ENCRYPTED(...))` wire framing a real Uhost peer
//! sends and expects.

use super::Subprocessor;
use crate::context::UtimContext;
use crate::routing::ProcessItem;
use crate::tag::{Status, Ucommand};
use crate::workers;

/// Dispatches on `body[0]` among the `Ucommand` tags, bracketed by the
/// ingress/egress crypto steps.
#[derive(Debug, Default)]
pub struct UhostSubprocessor;

impl Subprocessor for UhostSubprocessor {
    fn process(&self, ctx: &mut UtimContext, item: ProcessItem) -> ProcessItem {
        let item = self.maybe_unsign_and_decrypt(ctx, item);
        if item.is_terminal() {
            return item;
        }

        // Only items actually originating from Uhost carry a command tag to
        // dispatch on; an item merely passing through on its way *to*
        // Uhost (e.g. a HELLO/CHECK/TRUSTED produced by another
        // subprocessor or worker) only needs the final crypto wrap below.
        let item = if item.source == crate::tag::Address::Uhost {
            let item = self.dispatch(ctx, item);
            if item.is_terminal() {
                return item;
            }
            item
        } else {
            item
        };

        self.maybe_encrypt_and_sign(ctx, item)
    }
}

impl UhostSubprocessor {
    fn maybe_unsign_and_decrypt(&self, ctx: &mut UtimContext, item: ProcessItem) -> ProcessItem {
        use crate::tag::Address;
        if item.source != Address::Uhost || item.status != Status::Process {
            return item;
        }
        workers::unsecure::unsign_and_decrypt(ctx, item)
    }

    fn maybe_encrypt_and_sign(&self, ctx: &mut UtimContext, item: ProcessItem) -> ProcessItem {
        use crate::tag::Address;
        if item.destination != Address::Uhost || item.status != Status::Process {
            return item;
        }
        workers::secure::encrypt_and_sign(ctx, item)
    }

    fn dispatch(&self, ctx: &mut UtimContext, item: ProcessItem) -> ProcessItem {
        match item.command_tag().and_then(Ucommand::from_u8) {
            Some(Ucommand::TryFirst) => workers::try_challenge::utim_worker_try(ctx, item),
            Some(Ucommand::Init) => workers::init::utim_worker_init(ctx, item),
            Some(Ucommand::ConnectionString) => {
                workers::connection_string::utim_worker_connection_string(ctx, item)
            }
            Some(Ucommand::TestPlatformData) => {
                workers::platform_verify::utim_worker_platform_verify(ctx, item)
            }
            Some(Ucommand::Authentic) => workers::authentic::utim_worker_authentic(ctx, item),
            Some(Ucommand::Error) => workers::error::utim_worker_error(ctx, item),
            Some(Ucommand::Keepalive) => workers::keepalive::utim_worker_keepalive(ctx, item),
            Some(Ucommand::Die) => workers::die::utim_worker_die(ctx, item),
            _ => item.finalize(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, MqttConfig, Protocol};
    use crate::crypto;
    use crate::tag::Address;
    use crate::tlv;

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

    /// Wraps `plain` exactly as `maybe_encrypt_and_sign` would on egress:
    /// encrypt-then-sign, under `key` (or the NONE-mode passthrough with
    /// `None`).
    fn wrap(key: Option<&[u8]>, plain: &[u8]) -> Vec<u8> {
        let encrypted = crypto::encrypt(key, plain).unwrap();
        crypto::sign(key, &encrypted)
    }

    /// Reverses [`wrap`]: unsign-then-decrypt.
    fn unwrap_wire(key: Option<&[u8]>, wire: &[u8]) -> Vec<u8> {
        let message = crypto::unsign(key, wire).unwrap();
        crypto::decrypt(key, &message).unwrap()
    }

    #[test]
    fn unknown_tag_finalizes_without_emitting() {
        let mut context = ctx();
        let item = ProcessItem {
            source: Address::Uhost,
            destination: Address::Utim,
            status: Status::Process,
            body: Some(wrap(None, &[0xFF, 0x00, 0x00])),
        };
        let out = UhostSubprocessor.process(&mut context, item);
        assert_eq!(out.status, Status::Finalized);
    }

    #[test]
    fn keepalive_round_trip_without_session_key_is_none_mode_wrapped() {
        let mut context = ctx();
        let body = tlv::encode(Ucommand::Keepalive as u8, &[]);
        let item = ProcessItem {
            source: Address::Uhost,
            destination: Address::Utim,
            status: Status::Process,
            body: Some(wrap(None, &body)),
        };
        let out = UhostSubprocessor.process(&mut context, item);
        assert_eq!(out.status, Status::ToSend);
        assert_eq!(out.destination, Address::Uhost);
        let wire = out.body.unwrap();
        assert_eq!(wire[0], crate::tag::CryptoTag::Signed as u8);
        assert_eq!(wire[1], crate::tag::SignMode::None as u8);
        let plain = unwrap_wire(None, &wire);
        assert_eq!(plain[0], Ucommand::KeepaliveAnswer as u8);
    }

    #[test]
    fn keepalive_round_trip_with_session_key_is_encrypted_and_signed() {
        let mut context = ctx();
        let key = vec![0u8; 16];
        context.session_key = Some(key.clone());
        let body = tlv::encode(Ucommand::Keepalive as u8, &[]);
        let item = ProcessItem {
            source: Address::Uhost,
            destination: Address::Utim,
            status: Status::Process,
            body: Some(wrap(Some(&key), &body)),
        };
        let out = UhostSubprocessor.process(&mut context, item);
        assert_eq!(out.status, Status::ToSend);
        let wire = out.body.unwrap();
        assert_eq!(wire[0], crate::tag::CryptoTag::Signed as u8);
        assert_eq!(wire[1], crate::tag::SignMode::Sha256 as u8);
        let plain = unwrap_wire(Some(&key), &wire);
        assert_eq!(plain[0], Ucommand::KeepaliveAnswer as u8);
    }
}
