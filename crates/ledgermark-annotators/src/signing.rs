use ed25519_dalek::{Signature, Signer, Verifier};
use ledgermark_contracts::{
    derive_hash, parse_private_key, parse_public_key, signing_payload, Annotation,
    AnnotationKind, HashType,
};

use crate::errors::SigningError;
use crate::host::HostIdentity;

/// Signs the canonical payload of `annotation` and returns the raw signature bytes.
///
/// The payload covers `key`, `hash`, `host`, `kind` and `isSatisfied`; any
/// existing `signature` or `deviceId` is ignored.
///
/// # Errors
///
/// Returns [`SigningError::MalformedKey`] if `private_key` is not a supported
/// Ed25519 key encoding.
pub fn sign_annotation(private_key: &str, annotation: &Annotation) -> Result<Vec<u8>, SigningError> {
    let key = parse_private_key(private_key)?;
    let payload = signing_payload(annotation)?;
    Ok(key.sign(&payload).to_bytes().to_vec())
}

/// Checks the stored hex signature of `annotation` against `public_key`.
///
/// Returns `Ok(false)` when the signature is well-formed but does not match,
/// which is what a field altered after signing produces.
///
/// # Errors
///
/// Returns [`SigningError`] if the key or the signature encoding is malformed.
pub fn verify_annotation(public_key: &str, annotation: &Annotation) -> Result<bool, SigningError> {
    let key = parse_public_key(public_key)?;
    let bytes = hex::decode(&annotation.signature)
        .map_err(|e| SigningError::MalformedSignature(e.to_string()))?;
    let signature = Signature::from_slice(&bytes)
        .map_err(|e| SigningError::MalformedSignature(e.to_string()))?;
    let payload = signing_payload(annotation)?;
    Ok(key.verify(&payload, &signature).is_ok())
}

/// Builds and signs an annotation the same way for every annotator.
pub(crate) fn signed_annotation(
    hash: HashType,
    kind: AnnotationKind,
    private_key: &str,
    host: &dyn HostIdentity,
    data: &[u8],
    is_satisfied: bool,
) -> Result<Annotation, SigningError> {
    let key = derive_hash(hash, data);
    let mut annotation = Annotation::new(key, hash, host.hostname(), kind, is_satisfied);
    let signature = sign_annotation(private_key, &annotation)?;
    annotation.signature = hex::encode(signature);
    Ok(annotation)
}
