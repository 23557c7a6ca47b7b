//! Ed25519 key material in the text encodings ledger tooling emits.
//!
//! Private keys are accepted as hex of a 32-byte seed, a 64-byte seed‖public
//! keypair, or PKCS#8 DER. Public keys as hex of 32 raw bytes or SPKI DER.

use ed25519_dalek::{SigningKey, VerifyingKey, PUBLIC_KEY_LENGTH, SECRET_KEY_LENGTH};
use thiserror::Error;

const PKCS8_PREFIX: [u8; 16] = [
    0x30, 0x2e, 0x02, 0x01, 0x00, 0x30, 0x05, 0x06, 0x03, 0x2b, 0x65, 0x70, 0x04, 0x22, 0x04, 0x20,
];
const SPKI_PREFIX: [u8; 12] = [
    0x30, 0x2a, 0x30, 0x05, 0x06, 0x03, 0x2b, 0x65, 0x70, 0x03, 0x21, 0x00,
];

/// Errors raised while decoding key material.
#[derive(Debug, Error)]
pub enum KeyError {
    /// Key text is not hex.
    #[error("key is not valid hex: {0}")]
    Hex(#[from] hex::FromHexError),
    /// Decoded bytes have no recognised layout.
    #[error("unsupported key length: {0} bytes")]
    UnsupportedLength(usize),
    /// Bytes have the right length but are rejected by Ed25519.
    #[error("invalid ed25519 key: {0}")]
    Invalid(#[from] ed25519_dalek::SignatureError),
}

fn decode(text: &str) -> Result<Vec<u8>, KeyError> {
    let trimmed = text.trim();
    let trimmed = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    Ok(hex::decode(trimmed)?)
}

/// Parses an Ed25519 private key.
pub fn parse_private_key(text: &str) -> Result<SigningKey, KeyError> {
    let bytes = decode(text)?;
    match bytes.len() {
        SECRET_KEY_LENGTH => {
            let mut seed = [0u8; SECRET_KEY_LENGTH];
            seed.copy_from_slice(&bytes);
            Ok(SigningKey::from_bytes(&seed))
        }
        64 => {
            let mut pair = [0u8; 64];
            pair.copy_from_slice(&bytes);
            Ok(SigningKey::from_keypair_bytes(&pair)?)
        }
        48 if bytes[..16] == PKCS8_PREFIX => {
            let mut seed = [0u8; SECRET_KEY_LENGTH];
            seed.copy_from_slice(&bytes[16..]);
            Ok(SigningKey::from_bytes(&seed))
        }
        n => Err(KeyError::UnsupportedLength(n)),
    }
}

/// Parses an Ed25519 public key.
pub fn parse_public_key(text: &str) -> Result<VerifyingKey, KeyError> {
    let bytes = decode(text)?;
    let raw = match bytes.len() {
        PUBLIC_KEY_LENGTH => &bytes[..],
        44 if bytes[..12] == SPKI_PREFIX => &bytes[12..],
        n => return Err(KeyError::UnsupportedLength(n)),
    };
    let mut key = [0u8; PUBLIC_KEY_LENGTH];
    key.copy_from_slice(raw);
    Ok(VerifyingKey::from_bytes(&key)?)
}
