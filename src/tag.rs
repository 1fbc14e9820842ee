//! Wire tag tables (§6).
//!
//! `Address` and `Status` are internal routing tokens; `DataType` is the
//! wire-level classifier byte from §3 (values fixed by the spec). The
//! remaining families (`CryptoTag`, `SignMode`, `CryptoMode`, `Inbound`,
//! `Ucommand`, `Uplatform`) carry the single-byte tag values the source's
//! `tag.py`/`address.py`/`status.py` held; those files were not present in
//! the retrieved reference pack, so the concrete byte values below are
//! invented, self-consistent constants (recorded as an open decision in
//! `DESIGN.md`). Each family is only ever compared within its own dispatch
//! site (e.g. `Ucommand` against `body[0]` inside the Uhost subprocessor), so
//! no cross-family collision is observable.

/// Logical routing identity carried in a [`crate::routing::ProcessItem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Address {
    /// The local host application.
    Device,
    /// This agent, UTIM itself.
    Utim,
    /// The remote control-plane peer.
    Uhost,
    /// The downstream cloud endpoint reached via Uhost.
    Platform,
}

/// Lifecycle token of a routed item (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Still flowing through the dispatch loop.
    Process,
    /// Terminal: route to `destination`.
    ToSend,
    /// Terminal: drop.
    Finalized,
}

/// Wire-level routing classifier (§3, values fixed by the spec).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum DataType {
    /// The local Device.
    Device = 0,
    /// The remote Uhost.
    Uhost = 1,
    /// The downstream Platform.
    Platform = 2,
}

impl DataType {
    /// Recovers a `DataType` from its wire byte, if recognized.
    pub fn from_u8(b: u8) -> Option<Self> {
        match b {
            0 => Some(Self::Device),
            1 => Some(Self::Uhost),
            2 => Some(Self::Platform),
            _ => None,
        }
    }
}

/// Outer "secured" classification byte (§4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CryptoTag {
    /// The message is AES-CBC encrypted.
    Encrypted = 0xE0,
    /// The message is HMAC-SHA256 signed.
    Signed = 0xE1,
}

impl CryptoTag {
    /// Recovers a `CryptoTag` from its wire byte, if recognized.
    pub fn from_u8(b: u8) -> Option<Self> {
        match b {
            0xE0 => Some(Self::Encrypted),
            0xE1 => Some(Self::Signed),
            _ => None,
        }
    }
}

/// Sign-mode byte (§4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SignMode {
    /// Not signed.
    None = 0x00,
    /// HMAC-SHA256.
    Sha256 = 0x01,
}

/// Crypto-mode byte (§4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CryptoMode {
    /// Not encrypted.
    None = 0x00,
    /// AES-CBC.
    Aes = 0x01,
}

/// Device subprocessor dispatch tags (§4.7.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Inbound {
    /// Forward to Platform (handled outside the core).
    DataToPlatform = 0x02,
    /// Device signals the network link is up; kicks off SRP.
    NetworkReady = 0x01,
}

impl Inbound {
    /// Recovers an `Inbound` tag from its wire byte, if recognized.
    pub fn from_u8(b: u8) -> Option<Self> {
        match b {
            0x01 => Some(Self::NetworkReady),
            0x02 => Some(Self::DataToPlatform),
            _ => None,
        }
    }
}

/// Uhost subprocessor dispatch tags (§4.7.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Ucommand {
    /// Client hello carrying the SRP public ephemeral `A`.
    Hello = 0x01,
    /// Server's first TRY reply TLV (salt).
    TryFirst = 0x02,
    /// Server's second TRY reply TLV (`B`).
    TrySecond = 0x03,
    /// Client's SRP evidence message `M`.
    Check = 0x04,
    /// Server's session-confirmation message (`HAMK`).
    Init = 0x05,
    /// Client's post-SRP trusted-nonce message.
    Trusted = 0x06,
    /// Server confirms the session is authenticated.
    Authentic = 0x07,
    /// Cloud-platform connection string, wrapping an `Uplatform` tag.
    ConnectionString = 0x08,
    /// Server asks UTIM to verify platform-bound data.
    TestPlatformData = 0x09,
    /// Either side signals a protocol error.
    Error = 0x0A,
    /// Server liveness check.
    Keepalive = 0x0B,
    /// Reply to `Keepalive`.
    KeepaliveAnswer = 0x0C,
    /// Tears down the Utim instance (`utim_worker_die`, `SPEC_FULL.md` B —
    /// shipped in the source's worker table but unreachable from the
    /// distilled spec's Uhost dispatch list; wired in here so it isn't a
    /// dead letter).
    Die = 0x0D,
}

impl Ucommand {
    /// Recovers a `Ucommand` tag from its wire byte, if recognized.
    pub fn from_u8(b: u8) -> Option<Self> {
        match b {
            0x01 => Some(Self::Hello),
            0x02 => Some(Self::TryFirst),
            0x03 => Some(Self::TrySecond),
            0x04 => Some(Self::Check),
            0x05 => Some(Self::Init),
            0x06 => Some(Self::Trusted),
            0x07 => Some(Self::Authentic),
            0x08 => Some(Self::ConnectionString),
            0x09 => Some(Self::TestPlatformData),
            0x0A => Some(Self::Error),
            0x0B => Some(Self::Keepalive),
            0x0C => Some(Self::KeepaliveAnswer),
            0x0D => Some(Self::Die),
            _ => None,
        }
    }
}

/// Cloud-platform selector nested inside `Ucommand::ConnectionString` (§4.8.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Uplatform {
    /// Microsoft Azure IoT Hub.
    Azure = 0x01,
    /// Amazon Web Services IoT Core.
    Aws = 0x02,
}

impl Uplatform {
    /// Recovers a `Uplatform` tag from its wire byte, if recognized.
    pub fn from_u8(b: u8) -> Option<Self> {
        match b {
            0x01 => Some(Self::Azure),
            0x02 => Some(Self::Aws),
            _ => None,
        }
    }
}
