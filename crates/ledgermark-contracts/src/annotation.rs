use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::hash::HashType;
use crate::validation::ValidationError;

/// Trust check that produced an annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnnotationKind {
    /// An attestation event occurred for the data's device.
    #[serde(rename = "attestation")]
    Attestation,
    /// The data carried a TPM2 attestation quote from a remote device.
    #[serde(rename = "remote-tpm")]
    RemoteTpm,
}

impl AnnotationKind {
    /// Stable tag used in configuration and annotation JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            AnnotationKind::Attestation => "attestation",
            AnnotationKind::RemoteTpm => "remote-tpm",
        }
    }
}

impl fmt::Display for AnnotationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnnotationKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "attestation" => Ok(AnnotationKind::Attestation),
            "remote-tpm" => Ok(AnnotationKind::RemoteTpm),
            other => Err(ValidationError::PatternMismatch {
                field: "AnnotationKind",
                value: other.to_string(),
            }),
        }
    }
}

/// Signed statement about the outcome of one trust check against a piece of data.
///
/// Built and signed inside a single annotator call and read-only afterwards.
/// The signature covers `key`, `hash`, `host`, `kind` and `is_satisfied`; see
/// [`UNSIGNED_FIELDS`](crate::canonical::UNSIGNED_FIELDS) for what it leaves out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    /// Content address of the subject data.
    pub key: String,
    /// Algorithm that produced `key`.
    #[serde(rename = "hash")]
    pub hash_type: HashType,
    /// Node that evaluated the check.
    pub host: String,
    /// Trust check that produced this annotation.
    pub kind: AnnotationKind,
    /// Outcome of the trust check.
    pub is_satisfied: bool,
    /// Originating device, attached after signing by annotators that require it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
    /// Hex-encoded Ed25519 signature over the canonical payload.
    #[serde(default)]
    pub signature: String,
}

impl Annotation {
    /// Creates an unsigned annotation.
    pub fn new(
        key: impl Into<String>,
        hash_type: HashType,
        host: impl Into<String>,
        kind: AnnotationKind,
        is_satisfied: bool,
    ) -> Self {
        Self {
            key: key.into(),
            hash_type,
            host: host.into(),
            kind,
            is_satisfied,
            device_id: None,
            signature: String::new(),
        }
    }

    /// Whether a signature has been attached.
    pub fn is_signed(&self) -> bool {
        !self.signature.is_empty()
    }
}
