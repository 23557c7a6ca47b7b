//! Annotate command implementation.

use ledgermark_annotators::{annotator_for, AnnotatorSettings, SystemHost};
use ledgermark_contracts::{AnnotationKind, SdkConfig};
use std::path::PathBuf;
use std::sync::Arc;

use super::{context, read_input};
use crate::output::format_json;

pub fn run(
    config: PathBuf,
    kind: AnnotationKind,
    device_id: Option<String>,
    input: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = SdkConfig::from_path(&config)?;
    let settings = AnnotatorSettings::from_config(&config)?;
    let data = read_input(input.as_deref())?;

    let annotator = annotator_for(kind, &settings, Arc::new(SystemHost));
    let annotation = annotator.annotate(&context(device_id), &data)?;
    tracing::debug!(%kind, input = %super::display(&input), satisfied = annotation.is_satisfied, "annotated");

    println!("{}", format_json(&serde_json::to_value(&annotation)?));
    Ok(())
}
