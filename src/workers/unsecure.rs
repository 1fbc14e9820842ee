//! `utim_worker_unsign` / `utim_worker_decrypt` (§4.8.11): ingress crypto
//! from Uhost, applied in the opposite order from egress — unsign first,
//! then decrypt.

use crate::context::UtimContext;
use crate::crypto;
use crate::routing::ProcessItem;
use crate::tag::Status;

/// Applies [`crypto::unsign`] then [`crypto::decrypt`] to `item.body` under
/// `ctx.session_key`. Either step failing finalizes the item; on success
/// `status` stays `Process` so the Uhost subprocessor continues to command
/// dispatch with the recovered plaintext.
///
/// Runs unconditionally for every `Process`-status item sourced from Uhost,
/// key or no key: with no session key yet established, `crypto::unsign`/
/// `crypto::decrypt` strip the NONE-mode passthrough framing a real Uhost
/// still sends for pre-session handshake traffic (§4.7.2).
pub fn unsign_and_decrypt(ctx: &mut UtimContext, item: ProcessItem) -> ProcessItem {
    let session_key = ctx.session_key.clone();
    let Some(body) = item.body.as_deref() else {
        return item.finalize();
    };
    let Ok(message) = crypto::unsign(session_key.as_deref(), body) else {
        return item.finalize();
    };
    let Ok(plaintext) = crypto::decrypt(session_key.as_deref(), &message) else {
        return item.finalize();
    };
    ProcessItem {
        status: Status::Process,
        body: Some(plaintext),
        ..item
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, MqttConfig, Protocol};
    use crate::tag::Address;

    fn ctx() -> UtimContext {
        let mut c = UtimContext::new(
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
        c.session_key = Some(vec![0u8; 16]);
        c
    }

    #[test]
    fn recovers_plaintext_prefix_through_unsign_then_decrypt() {
        let mut context = ctx();
        let key = context.session_key.clone().unwrap();
        let encrypted = crypto::encrypt(Some(&key), b"ping").unwrap();
        let wrapped = crypto::sign(Some(&key), &encrypted);

        let item = ProcessItem {
            source: Address::Uhost,
            destination: Address::Utim,
            status: Status::Process,
            body: Some(wrapped),
        };
        let out = unsign_and_decrypt(&mut context, item);
        assert_eq!(out.status, Status::Process);
        assert!(out.body.unwrap().starts_with(b"ping"));
    }

    #[test]
    fn tampered_signature_finalizes() {
        let mut context = ctx();
        let key = context.session_key.clone().unwrap();
        let encrypted = crypto::encrypt(Some(&key), b"ping").unwrap();
        let mut wrapped = crypto::sign(Some(&key), &encrypted);
        *wrapped.last_mut().unwrap() ^= 0xFF;

        let item = ProcessItem {
            source: Address::Uhost,
            destination: Address::Utim,
            status: Status::Process,
            body: Some(wrapped),
        };
        let out = unsign_and_decrypt(&mut context, item);
        assert_eq!(out.status, Status::Finalized);
    }

    #[test]
    fn without_session_key_strips_none_mode_passthrough() {
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
        let encrypted = crypto::encrypt(None, b"ping").unwrap();
        let wrapped = crypto::sign(None, &encrypted);

        let item = ProcessItem {
            source: Address::Uhost,
            destination: Address::Utim,
            status: Status::Process,
            body: Some(wrapped),
        };
        let out = unsign_and_decrypt(&mut context, item);
        assert_eq!(out.status, Status::Process);
        assert_eq!(out.body.unwrap(), b"ping");
    }
}
