//! Shared data model for ledgermark provenance annotations.
//!
//! Every type that is hashed, signed or written to a ledger lives in this crate:
//! annotations and their publish envelope, ledger entity identifiers, the
//! content-hash derivation, the canonical byte form that signatures cover, key
//! material parsing, and the SDK configuration document.
//!
#![deny(missing_docs)]

/// Annotation record and its enumerated fields.
pub mod annotation;
/// Canonical byte form of annotations for signing.
pub mod canonical;
/// SDK configuration document.
pub mod config;
/// Content-hash derivation.
pub mod hash;
/// Ledger entity identifiers.
pub mod identifiers;
/// Ed25519 key material parsing.
pub mod keys;
/// Publish envelope.
pub mod message;
/// Validation errors for identifiers.
pub mod validation;

pub use annotation::{Annotation, AnnotationKind};
pub use canonical::{canonical_bytes, signing_payload, CanonicalizationError, UNSIGNED_FIELDS};
pub use config::{
    ConfigError, HashInfo, KeyAlgorithm, KeyInfo, LedgerConfig, NetType, SdkConfig, SignatureInfo,
};
pub use hash::{derive_hash, HashType};
pub use identifiers::{AccountId, ContractId, TopicId, TransactionId};
pub use keys::{parse_private_key, parse_public_key, KeyError};
pub use message::{PublishWrapper, SdkAction, ANNOTATION_LIST_TYPE};
pub use validation::ValidationError;
