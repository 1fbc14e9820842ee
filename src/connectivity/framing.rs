//! Double TLV framing on the L0/Device boundary (§2, §4.2, §6):
//!
//! ```text
//! DataLink frame = DataType(u8) ∥ length(u16 be) ∥ inner
//! inner          = DataType(u8) ∥ length(u16 be) ∥ payload
//! ```
//!
//! The outer tag identifies the physical link the frame arrived on (always
//! `DataType::Device` for the L0 datalink); the inner tag carries the
//! logical routing classification (`DEVICE`/`UHOST`/`PLATFORM`) the
//! Connectivity Manager dispatches on. Egress wraps in the opposite order:
//! inner first (logical destination), then outer (physical link tag).

use crate::tag::DataType;
use crate::tlv;

/// Decodes one double-wrapped datalink frame, returning the inner logical
/// `DataType` and its payload. Returns `None` on any malformed input or
/// unrecognized tag — per §4.3, invalid frames are logged and dropped, never
/// propagated as an error.
pub fn decode_frame(raw: &[u8]) -> Option<(DataType, Vec<u8>)> {
    let outer = tlv::decode(raw).ok()?;
    if DataType::from_u8(outer.tag)? != DataType::Device {
        return None;
    }
    let inner = tlv::decode(&outer.value).ok()?;
    let dt = DataType::from_u8(inner.tag)?;
    Some((dt, inner.value))
}

/// Encodes `payload` addressed to logical destination `dt`, double-wrapped
/// for transmission on the L0 datalink.
pub fn encode_frame(dt: DataType, payload: &[u8]) -> Vec<u8> {
    let inner = tlv::encode(dt as u8, payload);
    tlv::encode(DataType::Device as u8, &inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_device_frame() {
        let raw = encode_frame(DataType::Device, b"hello");
        let (dt, payload) = decode_frame(&raw).unwrap();
        assert_eq!(dt, DataType::Device);
        assert_eq!(payload, b"hello");
    }

    #[test]
    fn round_trip_uhost_destined_frame() {
        let raw = encode_frame(DataType::Uhost, b"forwarded");
        let (dt, payload) = decode_frame(&raw).unwrap();
        assert_eq!(dt, DataType::Uhost);
        assert_eq!(payload, b"forwarded");
    }

    #[test]
    fn rejects_frame_not_from_device_link() {
        let inner = tlv::encode(DataType::Uhost as u8, b"x");
        let raw = tlv::encode(DataType::Uhost as u8, &inner);
        assert_eq!(decode_frame(&raw), None);
    }

    #[test]
    fn rejects_truncated_input() {
        assert_eq!(decode_frame(&[0x00, 0x00, 0x10, 0xAA]), None);
    }
}
