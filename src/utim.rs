//! `Utim` (§4.9): the single façade an embedding application constructs,
//! connects, runs, and stops. Owns the config, the protocol context, the
//! Connectivity Manager and the Processor, and starts the long-running
//! threads described in §5.

use crate::config::Config;
use crate::connectivity::uhost::ManagerConnectionStatus;
use crate::connectivity::{ConnectivityManager, Datalink};
use crate::context::UtimContext;
use crate::error::ConnectivityError;
use crate::processor::Processor;
use crate::routing::RoutedItem;
use crate::tag::Address;
use std::sync::Arc;
use std::thread::JoinHandle;

/// Errors that can escape [`Utim::connect`] (§7: connection errors during
/// bring-up propagate out of the constructor/connect path; the launcher is
/// expected to terminate on them).
#[derive(Debug, thiserror::Error)]
pub enum UtimConnectError {
    /// The Connectivity Manager's `run_uhost_connection` itself failed.
    #[error(transparent)]
    Connectivity(#[from] ConnectivityError),
    /// `run_uhost_connection` returned without reaching `Success`.
    #[error("uhost connection did not reach Success (got {0:?})")]
    NotEstablished(ManagerConnectionStatus),
}

/// The UTIM agent façade.
pub struct Utim {
    ctx: UtimContext,
    connectivity: Arc<ConnectivityManager>,
    processor: Arc<Processor>,
    processor_handle: Option<JoinHandle<()>>,
}

impl Utim {
    /// Constructs a fresh agent over `datalink` (L0), not yet connected to
    /// Uhost.
    pub fn new(config: Config, datalink: Datalink) -> Result<Self, ConnectivityError> {
        let utim_name = config.utim_name_bytes()?;
        let master_key = config.master_key_bytes();
        let uhost_name = config.uhost_name_bytes()?;
        let uhost_topic = String::from_utf8_lossy(&uhost_name).into_owned();

        let ctx = UtimContext::new(config, utim_name, master_key);
        let connectivity = Arc::new(ConnectivityManager::new(datalink, uhost_topic));

        Ok(Self {
            processor: Arc::new(Processor::new(connectivity.clone())),
            ctx,
            connectivity,
            processor_handle: None,
        })
    }

    /// Establishes the Uhost MQTT connection. Propagates a connection error
    /// if bring-up fails or does not reach
    /// [`ManagerConnectionStatus::Success`] (§7).
    pub fn connect(&self) -> Result<(), UtimConnectError> {
        let status = self.connectivity.run_uhost_connection(&self.ctx.config)?;
        if status != ManagerConnectionStatus::Success {
            return Err(UtimConnectError::NotEstablished(status));
        }
        Ok(())
    }

    /// Starts the Connectivity Manager's inbound/outbound loops and the
    /// Processor's dispatch loop, each on its own OS thread (§5).
    pub fn run(&mut self) {
        self.connectivity.start();
        let processor = self.processor.clone();
        // `UtimContext` lives on the Processor thread only (O3): moved in
        // whole, never shared.
        let mut ctx = std::mem::replace(&mut self.ctx, placeholder_context());
        self.processor_handle = Some(std::thread::spawn(move || {
            processor.run(&mut ctx);
        }));
    }

    /// Feeds a synthetic inbound item directly to the Processor, bypassing
    /// the datalink — the shape the launcher uses to kick off SRP with a
    /// `NETWORK_READY` stimulus (§6).
    pub fn inject(&self, address: Address, body: Vec<u8>) -> bool {
        self.connectivity.inject(RoutedItem { address, body })
    }

    /// Cooperatively halts the Connectivity Manager and Processor loops
    /// (§4.9, §5). Idempotent.
    pub fn stop(&mut self) {
        self.processor.stop();
        self.connectivity.stop();
        if let Some(handle) = self.processor_handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Utim {
    fn drop(&mut self) {
        self.stop();
    }
}

fn placeholder_context() -> UtimContext {
    UtimContext::new(
        Config {
            mqtt: crate::config::MqttConfig {
                host: String::new(),
                user: String::new(),
                pass: String::new(),
                reconnect_time: 0,
            },
            utim_name: String::new(),
            master_key: String::new(),
            uhost_name: String::new(),
            protocol: crate::config::Protocol::Mqtt,
        },
        Vec::new(),
        Vec::new(),
    )
}
