//! Verify command implementation.

use ledgermark_annotators::verify_annotation;
use ledgermark_contracts::Annotation;
use std::path::PathBuf;

use super::{display, read_input};

pub fn run(public_key: PathBuf, annotation: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let key = std::fs::read_to_string(&public_key)
        .map_err(|e| format!("Failed to read {}: {}", public_key.display(), e))?;
    let bytes = read_input(annotation.as_deref())?;
    let parsed: Annotation = serde_json::from_slice(&bytes)
        .map_err(|e| format!("Invalid annotation in {}: {}", display(&annotation), e))?;

    if verify_annotation(key.trim(), &parsed)? {
        println!("valid");
        Ok(())
    } else {
        Err(format!("signature does not verify for {}", display(&annotation)).into())
    }
}
