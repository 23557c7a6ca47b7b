use std::sync::Arc;

use ledgermark_contracts::{AnnotationKind, ConfigError, HashType, SdkConfig};

use crate::attestation::AttestationAnnotator;
use crate::host::HostIdentity;
use crate::remote_tpm::RemoteTpmAnnotator;
use crate::Annotator;

/// Settings shared by every annotator.
#[derive(Clone, PartialEq, Eq)]
pub struct AnnotatorSettings {
    /// Content-hash algorithm for annotation keys.
    pub hash: HashType,
    /// Hex Ed25519 signing key text.
    pub private_key: String,
}

impl std::fmt::Debug for AnnotatorSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnnotatorSettings")
            .field("hash", &self.hash)
            .field("private_key", &"[redacted]")
            .finish()
    }
}

impl AnnotatorSettings {
    /// Reads settings from an SDK configuration, loading the private key file.
    pub fn from_config(config: &SdkConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            hash: config.hash.hash_type,
            private_key: config.signature.private.read()?,
        })
    }
}

/// Builds the annotator implementing `kind`.
pub fn annotator_for(
    kind: AnnotationKind,
    settings: &AnnotatorSettings,
    host: Arc<dyn HostIdentity>,
) -> Box<dyn Annotator> {
    match kind {
        AnnotationKind::Attestation => Box::new(AttestationAnnotator::new(
            settings.hash,
            settings.private_key.clone(),
            host,
        )),
        AnnotationKind::RemoteTpm => Box::new(RemoteTpmAnnotator::new(
            settings.hash,
            settings.private_key.clone(),
            host,
        )),
    }
}

/// Builds every annotator the configuration names, in configured order.
pub fn annotators_for(
    config: &SdkConfig,
    host: Arc<dyn HostIdentity>,
) -> Result<Vec<Box<dyn Annotator>>, ConfigError> {
    let settings = AnnotatorSettings::from_config(config)?;
    Ok(config
        .annotators
        .iter()
        .map(|kind| annotator_for(*kind, &settings, Arc::clone(&host)))
        .collect())
}
