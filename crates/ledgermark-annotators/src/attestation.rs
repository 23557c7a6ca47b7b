use std::sync::Arc;

use ledgermark_contracts::{Annotation, AnnotationKind, HashType};
use tracing::debug;

use crate::context::{RequestContext, DEVICE_ID_KEY};
use crate::errors::AnnotatorError;
use crate::host::HostIdentity;
use crate::signing::signed_annotation;
use crate::Annotator;

/// Records that an attestation event occurred for a device's data.
///
/// The check itself is always satisfied; what matters is the signed record
/// that it happened. The request must carry a device identifier.
///
/// The device identifier is attached after signing and is therefore not
/// covered by the signature. Verifiers must treat it as unauthenticated
/// metadata.
pub struct AttestationAnnotator {
    hash: HashType,
    private_key: String,
    host: Arc<dyn HostIdentity>,
}

impl AttestationAnnotator {
    /// Creates an annotator signing with `private_key` (hex Ed25519 key text).
    pub fn new(hash: HashType, private_key: impl Into<String>, host: Arc<dyn HostIdentity>) -> Self {
        Self {
            hash,
            private_key: private_key.into(),
            host,
        }
    }
}

impl Annotator for AttestationAnnotator {
    fn kind(&self) -> AnnotationKind {
        AnnotationKind::Attestation
    }

    fn annotate(&self, ctx: &RequestContext, data: &[u8]) -> Result<Annotation, AnnotatorError> {
        let device_id = ctx
            .device_id
            .as_deref()
            .ok_or(AnnotatorError::MissingContextValue(DEVICE_ID_KEY))?;

        let mut annotation = signed_annotation(
            self.hash,
            self.kind(),
            &self.private_key,
            self.host.as_ref(),
            data,
            true,
        )?;
        annotation.device_id = Some(device_id.to_string());
        debug!(key = %annotation.key, device_id, "attestation annotated");
        Ok(annotation)
    }
}
