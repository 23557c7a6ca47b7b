use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

use crate::annotation::AnnotationKind;
use crate::hash::HashType;
use crate::validation::ValidationError;

/// Errors raised while loading an SDK configuration document.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document or a key file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that failed to load.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The document is not valid configuration JSON.
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
    /// The document parsed but violates a constraint.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Ledger network a client connects to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetType {
    /// Production network.
    Mainnet,
    /// Public test network.
    Testnet,
    /// Preview network for upcoming releases.
    Previewnet,
}

impl NetType {
    /// Stable selector name.
    pub fn as_str(self) -> &'static str {
        match self {
            NetType::Mainnet => "mainnet",
            NetType::Testnet => "testnet",
            NetType::Previewnet => "previewnet",
        }
    }
}

impl fmt::Display for NetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NetType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mainnet" => Ok(NetType::Mainnet),
            "testnet" => Ok(NetType::Testnet),
            "previewnet" => Ok(NetType::Previewnet),
            other => Err(ValidationError::PatternMismatch {
                field: "NetType",
                value: other.to_string(),
            }),
        }
    }
}

/// Ledger connection and publication target.
///
/// Values are kept as loaded; the publisher parses and validates them at
/// construction so a bad selector or key is reported there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerConfig {
    /// Network selector (`mainnet`, `testnet`, `previewnet`).
    pub net_type: String,
    /// Operator account paying for transactions.
    pub account_id: String,
    /// Operator account private key.
    pub private_key: String,
    /// Topics to publish to, in order.
    pub topics: Vec<String>,
    /// Contract that records proof of each commit; enables proof-of-record publishing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_id: Option<String>,
}

/// Content-hash settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashInfo {
    /// Algorithm used for annotation keys.
    #[serde(rename = "type")]
    pub hash_type: HashType,
}

/// Signature algorithms a key file can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyAlgorithm {
    /// Ed25519.
    Ed25519,
}

/// Location and algorithm of one key file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyInfo {
    /// Key algorithm.
    #[serde(rename = "type")]
    pub key_type: KeyAlgorithm,
    /// Path to a file containing the hex-encoded key.
    pub path: PathBuf,
}

impl KeyInfo {
    /// Reads the key text, trimmed of surrounding whitespace.
    pub fn read(&self) -> Result<String, ConfigError> {
        std::fs::read_to_string(&self.path)
            .map(|text| text.trim().to_string())
            .map_err(|source| ConfigError::Io {
                path: self.path.clone(),
                source,
            })
    }
}

/// Key pair used to sign and verify annotations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureInfo {
    /// Verification key.
    pub public: KeyInfo,
    /// Signing key.
    pub private: KeyInfo,
}

/// Top-level SDK configuration document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdkConfig {
    /// Annotators to run, in order.
    pub annotators: Vec<AnnotationKind>,
    /// Content-hash settings.
    pub hash: HashInfo,
    /// Annotation signing keys.
    pub signature: SignatureInfo,
    /// Ledger publication target.
    pub ledger: LedgerConfig,
}

impl SdkConfig {
    /// Parses a configuration document from JSON text.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: SdkConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration document, resolving relative key paths against
    /// the document's directory.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_json(&text)?;
        if let Some(base) = path.parent() {
            for key in [&mut config.signature.public, &mut config.signature.private] {
                if key.path.is_relative() {
                    key.path = base.join(&key.path);
                }
            }
        }
        Ok(config)
    }

    /// Checks constraints serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ledger.topics.is_empty() {
            return Err(ConfigError::Invalid(
                "ledger.topics must name at least one topic".to_string(),
            ));
        }
        Ok(())
    }
}
