//! `utim_worker_try` (§4.8.2): processes the server's `TRY_FIRST`/`TRY_SECOND`
//! challenge pair and produces the client's SRP evidence.

use super::error_body;
use crate::context::{SrpStep, UtimContext};
use crate::routing::ProcessItem;
use crate::tag::{Address, Status, Ucommand};
use crate::tlv;

/// Handles `UCOMMAND.TRY_FIRST`, whose body concatenates two TLVs:
/// `(TRY_FIRST, salt)` and `(TRY_SECOND, B)`.
pub fn utim_worker_try(ctx: &mut UtimContext, item: ProcessItem) -> ProcessItem {
    let Some(body) = item.body.as_deref() else {
        return item.finalize();
    };

    let (first, rest) = match tlv::decode_with_remainder(body) {
        Ok(pair) => pair,
        Err(_) => return respond_with_error(item, "try processing"),
    };
    let second = match tlv::decode(rest) {
        Ok(tlv) => tlv,
        Err(_) => return respond_with_error(item, "try processing"),
    };
    if first.tag != Ucommand::TryFirst as u8 || second.tag != Ucommand::TrySecond as u8 {
        return respond_with_error(item, "try processing");
    }

    let salt = first.value;
    let b_pub = second.value;

    let m = ctx.srp_client.as_mut().and_then(|s| {
        s.process_challenge(&salt, &b_pub, &ctx.master_key)
    });

    match m {
        Some(m) => {
            ctx.srp_step = SrpStep::AwaitingConfirmation;
            let packet = tlv::encode(Ucommand::Check as u8, &m);
            ProcessItem {
                source: Address::Utim,
                destination: Address::Uhost,
                status: Status::Process,
                body: Some(packet),
            }
        }
        None => respond_with_error(item, "try processing"),
    }
}

fn respond_with_error(_item: ProcessItem, reason: &str) -> ProcessItem {
    ProcessItem {
        source: Address::Utim,
        destination: Address::Uhost,
        status: Status::Process,
        body: Some(error_body(reason)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, MqttConfig, Protocol};
    use crate::srp_client::SrpSession;
    use rand::RngCore;
    use sha2::Sha256;
    use srp::client::SrpClient;
    use srp::groups::G_2048;

    fn ctx_with_started_srp() -> (UtimContext, Vec<u8>) {
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
        let (session, _u, a_pub) = SrpSession::start_authentication(&context.utim_name);
        context.srp_client = Some(session);
        context.srp_step = SrpStep::AwaitingChallenge;
        (context, a_pub)
    }

    #[test]
    fn valid_challenge_advances_to_check() {
        let (mut context, a_pub) = ctx_with_started_srp();
        let mut salt = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut salt);

        let server_client = SrpClient::<Sha256>::new(&G_2048);
        let verifier = server_client.compute_verifier(&context.utim_name, &context.master_key, &salt);
        use srp::server::{SrpServer, UserRecord};
        let mut b_priv = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut b_priv);
        let server = SrpServer::<Sha256>::new(&G_2048);
        let record = UserRecord { username: &context.utim_name, salt: &salt, verifier: &verifier };
        let server_verifier = server
            .process_reply(&b_priv, &record, &a_pub)
            .expect("server accepts well-formed A");
        let b_pub = server_verifier.public_b_key();

        let mut body = tlv::encode(Ucommand::TryFirst as u8, &salt);
        body.extend_from_slice(&tlv::encode(Ucommand::TrySecond as u8, b_pub));

        let item = ProcessItem {
            source: Address::Uhost,
            destination: Address::Utim,
            status: Status::Process,
            body: Some(body),
        };
        let out = utim_worker_try(&mut context, item);
        assert_eq!(out.destination, Address::Uhost);
        assert_eq!(out.status, Status::Process);
        assert_eq!(out.body.as_ref().unwrap()[0], Ucommand::Check as u8);
        assert_eq!(context.srp_step, SrpStep::AwaitingConfirmation);
    }

    #[test]
    fn malformed_tlv_emits_error() {
        let (mut context, _a_pub) = ctx_with_started_srp();
        let item = ProcessItem {
            source: Address::Uhost,
            destination: Address::Utim,
            status: Status::Process,
            body: Some(vec![0x01, 0x00]),
        };
        let out = utim_worker_try(&mut context, item);
        assert_eq!(out.destination, Address::Uhost);
        assert_eq!(out.body.as_ref().unwrap()[0], Ucommand::Error as u8);
    }
}
