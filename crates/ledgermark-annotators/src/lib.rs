//! Trust-check annotators and annotation signing.
//!
//! This crate provides:
//! - Annotation signing and verification over the canonical payload
//! - The [`Annotator`] capability trait and its attestation and remote-TPM variants
//! - A decoder for TPM2 `TPMS_ATTEST` quote structures
//! - A registry that builds annotators from SDK configuration
//!
//! Core invariants:
//! - An annotation is created and signed inside one [`Annotator::annotate`] call
//! - A failed trust check is a signed annotation, never an error
//! - Required request values are checked before any hashing or signing work
//!
#![deny(missing_docs)]

/// Attestation-event annotator.
pub mod attestation;
/// Request-scoped values passed to annotators.
pub mod context;
/// Error types for annotator operations.
pub mod errors;
/// Local node identity.
pub mod host;
/// Annotator registry.
pub mod registry;
/// Remote TPM quote annotator.
pub mod remote_tpm;
/// Annotation signing and verification.
pub mod signing;
/// TPM2 attestation structure decoding.
pub mod tpm;

pub use attestation::AttestationAnnotator;
pub use context::RequestContext;
pub use errors::{AnnotatorError, SigningError};
pub use host::{HostIdentity, StaticHost, SystemHost};
pub use registry::{annotator_for, annotators_for, AnnotatorSettings};
pub use remote_tpm::RemoteTpmAnnotator;
pub use signing::{sign_annotation, verify_annotation};
pub use tpm::{decode_attestation, AttestationData, TpmDecodeError};

use ledgermark_contracts::{Annotation, AnnotationKind};

/// Capability to evaluate one trust check over raw data and sign the outcome.
///
/// Implementations evaluate their predicate, then build and sign an
/// [`Annotation`]. Callers only depend on this trait, so new checks are added
/// without touching them.
pub trait Annotator: Send + Sync {
    /// Trust check this annotator performs.
    fn kind(&self) -> AnnotationKind;

    /// Evaluates the check over `data` and returns the signed annotation.
    fn annotate(&self, ctx: &RequestContext, data: &[u8]) -> Result<Annotation, AnnotatorError>;
}
