//! SRP-6a client facade (§4.6).
//!
//! `spec.md` names the interface the core consumes from "an external SRP-6a
//! user library": `start_authentication`, `process_challenge`,
//! `verify_session`, `get_session_key`, `is_authenticated`. The real `srp`
//! crate (RustCrypto) exposes a lower-level, borrow-heavy API
//! (`SrpClient::compute_public_ephemeral`/`process_reply`,
//! `SrpClientVerifier::proof`/`verify_server`/`key`); [`SrpSession`] adapts
//! that real crate to the spec-named surface, the same way
//! `network::application::mqtt::client::Client` wraps a raw protocol in a
//! friendlier API.

use crate::error::SrpError;
use rand::RngCore;
use sha2::Sha256;
use srp::client::{SrpClient, SrpClientVerifier};
use srp::groups::G_2048;

/// A single client-side SRP-6a exchange.
///
/// Holds the ephemeral secret `a` and, once the server's challenge has been
/// processed, the resulting verifier (which carries the shared key).
pub struct SrpSession {
    client: SrpClient<'static, Sha256>,
    a_priv: Vec<u8>,
    username: Vec<u8>,
    verifier: Option<SrpClientVerifier<Sha256>>,
    authenticated: bool,
}

impl std::fmt::Debug for SrpSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SrpSession")
            .field("authenticated", &self.authenticated)
            .field("has_verifier", &self.verifier.is_some())
            .finish()
    }
}

impl SrpSession {
    /// Begins a new exchange, generating a fresh 32-byte ephemeral secret.
    /// Returns `(username, A)` to be sent as the client hello.
    pub fn start_authentication(username: &[u8]) -> (Self, Vec<u8>, Vec<u8>) {
        let mut a_priv = vec![0u8; 32];
        rand::thread_rng().fill_bytes(&mut a_priv);
        let client = SrpClient::<Sha256>::new(&G_2048);
        let a_pub = client.compute_public_ephemeral(&a_priv);
        let session = Self {
            client,
            a_priv,
            username: username.to_vec(),
            verifier: None,
            authenticated: false,
        };
        (session, username.to_vec(), a_pub)
    }

    /// Processes the server's `(salt, B)` challenge against `password`,
    /// returning the client evidence `M` to send back, or `None` on
    /// rejection (e.g. a malicious/malformed `B`).
    pub fn process_challenge(&mut self, salt: &[u8], b_pub: &[u8], password: &[u8]) -> Option<Vec<u8>> {
        match self
            .client
            .process_reply(&self.a_priv, &self.username, password, salt, b_pub)
        {
            Ok(verifier) => {
                let proof = verifier.proof().to_vec();
                self.verifier = Some(verifier);
                Some(proof)
            }
            Err(_) => None,
        }
    }

    /// Verifies the server's session-confirmation proof (`HAMK`). Sets the
    /// authenticated flag on success.
    pub fn verify_session(&mut self, hamk: &[u8]) -> Result<(), SrpError> {
        let verifier = self.verifier.as_ref().ok_or(SrpError::NotStarted)?;
        verifier
            .verify_server(hamk)
            .map_err(|e| SrpError::Rejected(e.to_string()))?;
        self.authenticated = true;
        Ok(())
    }

    /// Returns the derived session key, once `verify_session` has succeeded.
    pub fn get_session_key(&self) -> Option<Vec<u8>> {
        self.verifier.as_ref().map(|v| v.key().to_vec())
    }

    /// True once `verify_session` has succeeded.
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }
}
