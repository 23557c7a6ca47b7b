use serde::{Deserialize, Serialize};
use sha2::{Digest as Sha2Digest, Sha256};
use std::fmt;
use std::str::FromStr;

use crate::validation::ValidationError;

/// Content-hash algorithms an annotator can be configured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashType {
    /// SHA-256.
    Sha256,
    /// BLAKE3 (256-bit output).
    Blake3,
    /// No hashing; the key is the hex form of the data itself.
    None,
}

impl HashType {
    /// Stable name used in configuration and annotation JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            HashType::Sha256 => "sha256",
            HashType::Blake3 => "blake3",
            HashType::None => "none",
        }
    }
}

impl fmt::Display for HashType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sha256" => Ok(HashType::Sha256),
            "blake3" => Ok(HashType::Blake3),
            "none" => Ok(HashType::None),
            other => Err(ValidationError::PatternMismatch {
                field: "HashType",
                value: other.to_string(),
            }),
        }
    }
}

/// Derives the content key of `data` under `algorithm`.
///
/// The key is the lowercase hex encoding of the digest. Total over every input,
/// including the empty slice, which yields the digest of the empty sequence.
///
/// ```rust
/// use ledgermark_contracts::{derive_hash, HashType};
///
/// let key = derive_hash(HashType::Sha256, b"foo");
/// assert_eq!(key, "2c26b46b68ffc68ff99b453c1d30413413422d706483bfa0f98a5e886266e7ae");
/// ```
pub fn derive_hash(algorithm: HashType, data: &[u8]) -> String {
    match algorithm {
        HashType::Sha256 => hex::encode(Sha256::digest(data)),
        HashType::Blake3 => blake3::hash(data).to_hex().to_string(),
        HashType::None => hex::encode(data),
    }
}
