use thiserror::Error;

/// Failures producing or checking annotation signatures.
#[derive(Error, Debug)]
pub enum SigningError {
    /// The key text could not be decoded into an Ed25519 key.
    #[error("malformed key: {0}")]
    MalformedKey(#[from] ledgermark_contracts::KeyError),
    /// The annotation could not be brought into canonical form.
    #[error("canonicalization failed: {0}")]
    Canonicalization(#[from] ledgermark_contracts::CanonicalizationError),
    /// The stored signature is not a hex-encoded Ed25519 signature.
    #[error("malformed signature: {0}")]
    MalformedSignature(String),
}

/// Errors returned by [`Annotator::annotate`](crate::Annotator::annotate).
#[derive(Error, Debug)]
pub enum AnnotatorError {
    /// A required request-scoped value was absent.
    #[error("`{0}` not found in annotator request context")]
    MissingContextValue(&'static str),
    /// Signing the annotation failed.
    #[error("signing failed: {0}")]
    Signing(#[from] SigningError),
}
