//! Command implementations.

pub mod annotate;
pub mod hash;
pub mod history;
pub mod keygen;
pub mod publish;
pub mod verify;

use std::io::Read;
use std::path::{Path, PathBuf};

/// Reads a file, or stdin when no path is given.
pub fn read_input(input: Option<&Path>) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    match input {
        Some(path) => std::fs::read(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e).into()),
        None => {
            let mut buf = Vec::new();
            std::io::stdin().read_to_end(&mut buf)?;
            Ok(buf)
        }
    }
}

/// Builds the request context from an optional device identifier.
pub fn context(device_id: Option<String>) -> ledgermark_annotators::RequestContext {
    match device_id {
        Some(id) => ledgermark_annotators::RequestContext::with_device_id(id),
        None => ledgermark_annotators::RequestContext::new(),
    }
}

pub(crate) fn display(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "stdin".to_string())
}
