//! Error taxonomy for the UTIM core, grouped by the layer that raises them.
//!
//! Parse-level errors (malformed TLV, unknown tags) are represented here but,
//! per the propagation policy, are logged and dropped at the call site rather
//! than bubbled past a queue boundary; only connection bring-up errors are
//! expected to escape to a caller.

use thiserror::Error;

/// Errors raised while establishing or classifying connectivity.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConnectivityError {
    /// The supplied [`crate::config::Config`] is missing or malformed.
    #[error("connectivity configuration is invalid")]
    ConnectivityConfigError,
    /// The configured MQTT host could not be resolved or reached.
    #[error("connectivity host is unreachable")]
    ConnectivityHostError,
    /// The broker rejected the configured credentials.
    #[error("connectivity credentials were rejected")]
    ConnectivityCredentialsError,
    /// Connectivity failed for a reason not otherwise classified.
    #[error("unknown connectivity failure")]
    ConnectivityUnknownError,
    /// A `DataType` byte did not match any known routing classifier.
    #[error("unrecognized data type on the wire")]
    ManagerDataTypeError,
    /// A datalink operation was invoked with arguments it cannot accept.
    #[error("datalink operation received invalid arguments")]
    DataLinkWrongArgsError,
    /// The datalink connection is closed or otherwise unusable.
    #[error("datalink connection error")]
    DataLinkConnectionError,
}

/// Errors raised by the Uhost MQTT ack/retry wrapper.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum UhostConnectionError {
    /// The underlying connection to Uhost is not established.
    #[error("uhost connection is not established")]
    NotConnected,
    /// `publish` was called with arguments of the wrong shape (empty sender,
    /// oversized message id, etc).
    #[error("invalid arguments supplied to publish/exchange")]
    ExchangeError,
}

/// Errors raised while reconstructing a [`crate::routing::ProcessItem`] from
/// wire bytes.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ProcessItemInputError {
    /// The body was too short to contain the tag it claimed to carry.
    #[error("process item body too short for declared tag")]
    TooShort,
    /// A nested TLV's declared length did not match available bytes.
    #[error("malformed nested TLV")]
    MalformedTlv,
}

/// Errors raised by the TLV codec (§4.2).
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ProtocolParseError {
    /// Fewer than 3 bytes were supplied; no tag/length header is present.
    #[error("input shorter than a TLV header")]
    TooShort,
    /// The declared length exceeds the number of bytes actually available.
    #[error("declared length exceeds available bytes")]
    TruncatedValue,
}

/// Errors raised by the cryptography layer (§4.5).
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum CryptoError {
    /// Encryption or signing was requested with no session key set.
    #[error("no session key is set")]
    NoSessionKey,
    /// The ciphertext or signed message was too short to contain its tags.
    #[error("input too short to be a valid secured message")]
    TooShort,
    /// HMAC verification failed.
    #[error("hmac verification failed")]
    SignatureMismatch,
    /// The underlying block cipher rejected the input (bad block size, etc).
    #[error("block cipher error")]
    CipherError,
}

/// Errors raised by the SRP client facade (§4.6).
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum SrpError {
    /// `process_challenge` or `verify_session` was called before
    /// `start_authentication`.
    #[error("srp session has not been started")]
    NotStarted,
    /// The server's challenge or proof was rejected by the underlying SRP
    /// implementation.
    #[error("srp exchange was rejected: {0}")]
    Rejected(String),
}
