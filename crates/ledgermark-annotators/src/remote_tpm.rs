use std::sync::Arc;

use ledgermark_contracts::{Annotation, AnnotationKind, HashType};
use tracing::debug;

use crate::context::RequestContext;
use crate::errors::AnnotatorError;
use crate::host::HostIdentity;
use crate::signing::signed_annotation;
use crate::tpm::decode_attestation;
use crate::Annotator;

/// Checks that the data is a well-formed TPM2 attestation quote from a remote device.
///
/// Empty or malformed input is a negative outcome, not an error: the
/// annotation is still signed and returned with `is_satisfied = false`.
pub struct RemoteTpmAnnotator {
    hash: HashType,
    private_key: String,
    host: Arc<dyn HostIdentity>,
}

impl RemoteTpmAnnotator {
    /// Creates an annotator signing with `private_key` (hex Ed25519 key text).
    pub fn new(hash: HashType, private_key: impl Into<String>, host: Arc<dyn HostIdentity>) -> Self {
        Self {
            hash,
            private_key: private_key.into(),
            host,
        }
    }
}

fn is_valid_quote(data: &[u8]) -> bool {
    match decode_attestation(data) {
        Ok(_) => true,
        Err(reason) => {
            debug!(%reason, len = data.len(), "attestation blob rejected");
            false
        }
    }
}

impl Annotator for RemoteTpmAnnotator {
    fn kind(&self) -> AnnotationKind {
        AnnotationKind::RemoteTpm
    }

    fn annotate(&self, _ctx: &RequestContext, data: &[u8]) -> Result<Annotation, AnnotatorError> {
        let is_satisfied = is_valid_quote(data);
        Ok(signed_annotation(
            self.hash,
            self.kind(),
            &self.private_key,
            self.host.as_ref(),
            data,
            is_satisfied,
        )?)
    }
}
