//! Cryptography layer (§4.5): AES-CBC encrypt/decrypt and HMAC-SHA256
//! sign/unsign, applied symmetrically to Uhost traffic once a session key is
//! set.
//!
//! The block cipher and MAC primitives themselves are out of scope per
//! `spec.md` §1 ("the AES and HMAC primitives" are external collaborators);
//! this module only implements the framing and padding rules around them,
//! using the RustCrypto `aes`/`cbc`/`hmac`/`sha2` crates as that external
//! collaborator.

use crate::error::CryptoError;
use crate::tag::{CryptoMode, CryptoTag, SignMode};
use aes::Aes128;
use cbc::cipher::block_padding::NoPadding;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type Aes128CbcEnc = cbc::Encryptor<Aes128>;
type Aes128CbcDec = cbc::Decryptor<Aes128>;
type HmacSha256 = Hmac<Sha256>;

/// Fixed 16-byte IV baked into the wire format (§4.5). Shared across all
/// sessions; a known weakness, preserved here for wire compatibility as
/// directed by §9.
pub const FIXED_IV: [u8; 16] = [
    0x75, 0xbe, 0x38, 0x2b, 0x42, 0x51, 0xc7, 0x05, 0xa2, 0x43, 0x23, 0x5d, 0xe0, 0xf4, 0xb5, 0x08,
];

const BLOCK_SIZE: usize = 16;
const SPACE_PAD: u8 = 0x20;
const HMAC_LEN: usize = 32;

/// Right-pads `data` with ASCII space to the next 16-byte boundary. A
/// zero-length input is padded to one full block, matching the source's
/// unconditional block-cipher call.
fn space_pad(data: &[u8]) -> Vec<u8> {
    let mut out = data.to_vec();
    let remainder = out.len() % BLOCK_SIZE;
    let pad_len = if remainder == 0 && !out.is_empty() {
        0
    } else {
        BLOCK_SIZE - remainder
    };
    out.extend(std::iter::repeat(SPACE_PAD).take(pad_len));
    out
}

/// Derives the 16-byte AES-128 key used by this layer from a session key of
/// arbitrary length, by taking its first 16 bytes (padding with zero bytes
/// if shorter). The spec leaves the exact K-derivation to the implementer
/// (§3); AES-128 is chosen as the narrowest key size the wire format needs
/// to support, recorded as an open decision in `DESIGN.md`.
fn derive_aes_key(session_key: &[u8]) -> [u8; 16] {
    let mut key = [0u8; 16];
    let n = session_key.len().min(16);
    key[..n].copy_from_slice(&session_key[..n]);
    key
}

/// Encrypts `plaintext` with AES-CBC under `session_key` and the fixed IV,
/// producing `CRYPTO.ENCRYPTED ∥ mode ∥ ciphertext`. With `session_key ==
/// None`, produces `CRYPTO.ENCRYPTED ∥ NONE ∥ plaintext` unchanged.
pub fn encrypt(session_key: Option<&[u8]>, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let Some(session_key) = session_key else {
        let mut out = vec![CryptoTag::Encrypted as u8, CryptoMode::None as u8];
        out.extend_from_slice(plaintext);
        return Ok(out);
    };
    let key = derive_aes_key(session_key);
    let padded = space_pad(plaintext);
    let ciphertext = Aes128CbcEnc::new(&key.into(), &FIXED_IV.into())
        .encrypt_padded_vec_mut::<NoPadding>(&padded);
    let mut out = Vec::with_capacity(2 + ciphertext.len());
    out.push(CryptoTag::Encrypted as u8);
    out.push(CryptoMode::Aes as u8);
    out.extend_from_slice(&ciphertext);
    Ok(out)
}

/// Decrypts a `CRYPTO.ENCRYPTED ∥ mode ∥ ciphertext` message produced by
/// [`encrypt`]. Trailing 0x20 padding is NOT stripped (§4.5, §9); callers
/// must tolerate it.
///
/// The NONE-mode passthrough only applies when no key is set at all —
/// matching the source's `decrypt`, which returns the plaintext for
/// `mode == NONE` only while `self.__key is None`, and otherwise falls
/// through. A NONE-mode body arriving while a session key is set (or an
/// AES-mode body arriving with none) is rejected rather than passed through.
pub fn decrypt(session_key: Option<&[u8]>, body: &[u8]) -> Result<Vec<u8>, CryptoError> {
    if body.len() < 2 {
        return Err(CryptoError::TooShort);
    }
    let mode = body[1];
    let rest = &body[2..];
    match (session_key, mode) {
        (None, m) if m == CryptoMode::None as u8 => Ok(rest.to_vec()),
        (Some(session_key), m) if m == CryptoMode::Aes as u8 => {
            if rest.is_empty() || rest.len() % BLOCK_SIZE != 0 {
                return Err(CryptoError::CipherError);
            }
            let key = derive_aes_key(session_key);
            let mut buf = rest.to_vec();
            Aes128CbcDec::new(&key.into(), &FIXED_IV.into())
                .decrypt_padded_mut::<NoPadding>(&mut buf)
                .map_err(|_| CryptoError::CipherError)?;
            Ok(buf)
        }
        _ => Err(CryptoError::NoSessionKey),
    }
}

/// Signs `message` with HMAC-SHA256 under `session_key`, producing
/// `CRYPTO.SIGNED ∥ SHA256 ∥ message ∥ hmac`. With `session_key == None`,
/// produces `CRYPTO.SIGNED ∥ NONE ∥ message` unchanged — the same
/// passthrough idiom `encrypt` uses, so every Uhost-bound message carries
/// the wire framing whether or not a session is established yet (§4.7.2).
pub fn sign(session_key: Option<&[u8]>, message: &[u8]) -> Vec<u8> {
    let Some(session_key) = session_key else {
        let mut out = vec![CryptoTag::Signed as u8, SignMode::None as u8];
        out.extend_from_slice(message);
        return out;
    };
    let mut mac = <HmacSha256 as Mac>::new_from_slice(session_key)
        .expect("HMAC accepts keys of any length");
    mac.update(message);
    let tag = mac.finalize().into_bytes();

    let mut out = Vec::with_capacity(2 + message.len() + HMAC_LEN);
    out.push(CryptoTag::Signed as u8);
    out.push(SignMode::Sha256 as u8);
    out.extend_from_slice(message);
    out.extend_from_slice(&tag);
    out
}

/// Verifies and strips a signature produced by [`sign`], returning the
/// message portion on success (P2). With `session_key == None` and a
/// NONE-mode body, strips the two-byte header unchanged; any other
/// key/mode combination is rejected.
pub fn unsign(session_key: Option<&[u8]>, body: &[u8]) -> Result<Vec<u8>, CryptoError> {
    if body.len() < 2 {
        return Err(CryptoError::TooShort);
    }
    let mode = body[1];
    match (session_key, mode) {
        (None, m) if m == SignMode::None as u8 => Ok(body[2..].to_vec()),
        (Some(session_key), m) if m == SignMode::Sha256 as u8 => {
            if body.len() < 2 + HMAC_LEN {
                return Err(CryptoError::TooShort);
            }
            let message = &body[2..body.len() - HMAC_LEN];
            let claimed_tag = &body[body.len() - HMAC_LEN..];

            let mut mac = <HmacSha256 as Mac>::new_from_slice(session_key)
                .expect("HMAC accepts keys of any length");
            mac.update(message);
            mac.verify_slice(claimed_tag)
                .map_err(|_| CryptoError::SignatureMismatch)?;
            Ok(message.to_vec())
        }
        _ => Err(CryptoError::NoSessionKey),
    }
}

/// True iff `message`'s outer tag indicates `ENCRYPTED`/`SIGNED` and its
/// mode byte is non-`NONE`.
pub fn is_secured(message: &[u8]) -> bool {
    if message.len() < 2 {
        return false;
    }
    let outer_secured = CryptoTag::from_u8(message[0]).is_some();
    outer_secured && message[1] != 0x00
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_then_unsign_round_trips() {
        let key = b"session-key-0123456789";
        for msg in [b"".as_slice(), b"ping".as_slice(), b"a longer message body".as_slice()] {
            let signed = sign(Some(key), msg);
            let recovered = unsign(Some(key), &signed).unwrap();
            assert_eq!(recovered, msg);
        }
    }

    #[test]
    fn unsign_detects_tamper() {
        let key = b"session-key";
        let mut signed = sign(Some(key), b"ping");
        *signed.last_mut().unwrap() ^= 0xFF;
        assert_eq!(unsign(Some(key), &signed), Err(CryptoError::SignatureMismatch));
    }

    #[test]
    fn sign_without_key_is_passthrough() {
        let signed = sign(None, b"ping");
        assert_eq!(signed[0], CryptoTag::Signed as u8);
        assert_eq!(signed[1], SignMode::None as u8);
        assert_eq!(&signed[2..], b"ping");
        assert_eq!(unsign(None, &signed).unwrap(), b"ping");
    }

    #[test]
    fn encrypt_then_decrypt_round_trips_up_to_padding() {
        let key = [0u8; 16];
        let plaintext = b"ping";
        let encrypted = encrypt(Some(&key), plaintext).unwrap();
        let decrypted = decrypt(Some(&key), &encrypted).unwrap();
        assert!(decrypted.starts_with(plaintext));
        assert!(decrypted[plaintext.len()..].iter().all(|&b| b == SPACE_PAD));
    }

    #[test]
    fn encrypt_without_key_is_passthrough() {
        let encrypted = encrypt(None, b"ping").unwrap();
        assert_eq!(encrypted[0], CryptoTag::Encrypted as u8);
        assert_eq!(encrypted[1], CryptoMode::None as u8);
        assert_eq!(&encrypted[2..], b"ping");
        assert_eq!(decrypt(None, &encrypted).unwrap(), b"ping");
    }

    #[test]
    fn is_secured_requires_nonzero_mode() {
        assert!(!is_secured(&[CryptoTag::Encrypted as u8, 0x00]));
        assert!(is_secured(&[CryptoTag::Encrypted as u8, CryptoMode::Aes as u8]));
        assert!(!is_secured(&[0xFF, 0x01]));
    }
}
