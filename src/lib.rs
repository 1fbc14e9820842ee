//! # utim - device-side trusted identity agent
//!
//! UTIM sits between a local Device, a remote Uhost, and a Platform backend,
//! speaking MQTT to Uhost and a framed byte link to the Device. It performs
//! SRP-6a mutual authentication with Uhost to derive a session key, then
//! routes tagged messages between the three parties through a layered
//! TLV-framing and state-machine dispatch pipeline, encrypting and signing
//! Uhost traffic once a session is established.
//!
//! ## Layers
//!
//! - [`queue`] / [`tag`] / [`tlv`]: the bounded queue, wire tag tables, and
//!   TLV codec shared by every layer above them.
//! - [`crypto`] / [`srp_client`]: the AES-CBC/HMAC framing and the SRP-6a
//!   client facade.
//! - [`connectivity`]: L1–L3, the Device datalink framing and the Uhost MQTT
//!   connection, multiplexed into a single fan-in/fan-out pair of queues.
//! - [`routing`] / [`context`]: the records threaded through dispatch and the
//!   single long-lived protocol state instance.
//! - [`subprocessor`] / [`workers`]: L5/L6, the address-keyed handlers and
//!   the pure functions they dispatch to.
//! - [`processor`]: L4, the dispatch loop tying L3 through L6 together.
//! - [`utim`]: the façade an embedding application constructs, connects,
//!   runs, and stops.
//!
//! ## Usage
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! utim = "0.1.0"
//! ```
//!
//! ```rust,no_run
//! use utim::config::{Config, MqttConfig, Protocol};
//! use utim::connectivity::Datalink;
//! use utim::tag::{Address, Inbound};
//! use utim::utim::Utim;
//!
//! let config = Config {
//!     mqtt: MqttConfig {
//!         host: "mqtt.example.com:1883".into(),
//!         user: "utim".into(),
//!         pass: "secret".into(),
//!         reconnect_time: 5,
//!     },
//!     utim_name: "55544d".into(),
//!     master_key: "6b6579".into(),
//!     uhost_name: "556f".into(),
//!     protocol: Protocol::Mqtt,
//! };
//!
//! let mut agent = Utim::new(config, Datalink::new())?;
//! agent.connect()?;
//! agent.run();
//! agent.inject(Address::Device, vec![Inbound::NetworkReady as u8]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(missing_docs)]
#![warn(missing_debug_implementations)]

/// Fixed-key configuration: MQTT endpoint, device/uhost identity, and
/// transport flavor.
pub mod config;

/// Connectivity Manager (L1–L3): Device datalink framing and the Uhost MQTT
/// connection.
pub mod connectivity;

/// `UtimContext`: the single process-lifetime protocol state instance.
pub mod context;

/// Cryptography layer: AES-CBC encrypt/decrypt and HMAC-SHA256 sign/unsign.
pub mod crypto;

/// Error taxonomy for the UTIM core, grouped by the layer that raises them.
pub mod error;

/// L4 Processor: the dispatch loop driving items through Subprocessors and
/// Workers until they reach a terminal status.
pub mod processor;

/// Bounded FIFO queue used at every queue boundary in the core.
pub mod queue;

/// Routed items: the records that flow between the Connectivity Manager,
/// the Processor, the Subprocessors, and the Workers.
pub mod routing;

/// SRP-6a client facade wrapping the `srp` crate in the spec-named surface.
pub mod srp_client;

/// L5 Subprocessors: the three address-keyed handlers the Processor
/// dispatches a `ProcessItem` to.
pub mod subprocessor;

/// Wire tag tables: routing addresses, status, and the single-byte command
/// families.
pub mod tag;

/// TLV codec: `tag:u8 ∥ length:u16be ∥ value`.
pub mod tlv;

/// The `Utim` façade: construct, connect, run, and stop an agent instance.
pub mod utim;

/// L6 Workers: the pure `(ctx, item) -> item'` functions each Subprocessor
/// dispatches to.
pub mod workers;
