//! `UtimContext` (§3, §4.9): the single process-lifetime instance carrying
//! protocol state. Per §5, every field here is read and written only on the
//! Processor thread (O3), so no internal locking is required by
//! construction — callers on other threads only ever see it via messages on
//! a queue.

use crate::config::Config;
use crate::srp_client::SrpSession;

/// Where the current SRP-6a exchange stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SrpStep {
    /// No exchange in progress.
    None,
    /// Hello sent, awaiting the server's TRY challenge.
    AwaitingChallenge,
    /// Check sent, awaiting the server's INIT confirmation.
    AwaitingConfirmation,
}

/// Protocol state shared by the Processor and the Workers it dispatches to.
#[derive(Debug)]
pub struct UtimContext {
    /// Static configuration this agent was constructed with.
    pub config: Config,
    /// This agent's identity, hex-decoded once at construction.
    pub utim_name: Vec<u8>,
    /// The statically-provisioned password used for SRP authentication
    /// (§4.6 — a placeholder in the source; real provisioning is out of
    /// scope here).
    pub master_key: Vec<u8>,
    /// The in-progress or completed SRP exchange, if one has been started.
    pub srp_client: Option<SrpSession>,
    /// Where the SRP exchange currently stands.
    pub srp_step: SrpStep,
    /// The session key derived by a successful SRP exchange. Encryption and
    /// signing of Uhost traffic are enabled iff this is `Some` (I3).
    pub session_key: Option<Vec<u8>>,
    /// Cloud-platform connection configuration relayed via
    /// `Ucommand::ConnectionString`.
    pub platform_config: Option<serde_json::Value>,
    /// Set by `utim_worker_die`; observed by the façade to trigger shutdown.
    shutdown_requested: bool,
}

impl UtimContext {
    /// Constructs a fresh context from static configuration and the
    /// provisioned master key.
    pub fn new(config: Config, utim_name: Vec<u8>, master_key: Vec<u8>) -> Self {
        Self {
            config,
            utim_name,
            master_key,
            srp_client: None,
            srp_step: SrpStep::None,
            session_key: None,
            platform_config: None,
            shutdown_requested: false,
        }
    }

    /// True iff encryption/signing of Uhost traffic is enabled (I3).
    pub fn is_secured(&self) -> bool {
        self.session_key.is_some()
    }

    /// Tears down protocol state: clears the session key, the SRP exchange,
    /// and requests that the façade stop all loops (`utim_worker_die`,
    /// `SPEC_FULL.md` B).
    pub fn teardown(&mut self) {
        self.session_key = None;
        self.srp_client = None;
        self.srp_step = SrpStep::None;
        self.shutdown_requested = true;
    }

    /// True after [`UtimContext::teardown`] has run.
    pub fn shutdown_requested(&self) -> bool {
        self.shutdown_requested
    }
}
