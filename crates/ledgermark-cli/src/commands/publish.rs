//! Publish command implementation.

use ledgermark_annotators::{annotators_for, SystemHost};
use ledgermark_contracts::{PublishWrapper, SdkAction, SdkConfig};
use ledgermark_ledger::{publish_and_close, LedgerPublisher, LocalLedger, Publisher};
use std::path::PathBuf;
use std::sync::Arc;

use super::{context, read_input};

pub fn run(
    config: PathBuf,
    ledger_dir: PathBuf,
    device_id: Option<String>,
    action: SdkAction,
    input: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = SdkConfig::from_path(&config)?;
    let data = read_input(input.as_deref())?;
    let ctx = context(device_id);

    let annotations = annotators_for(&config, Arc::new(SystemHost))?
        .iter()
        .map(|annotator| annotator.annotate(&ctx, &data))
        .collect::<Result<Vec<_>, _>>()?;
    let count = annotations.len();
    let wrapper = PublishWrapper::new(action, annotations);

    let mut publisher =
        LedgerPublisher::new(&config.ledger, |net| Ok(LocalLedger::open(&ledger_dir, net)?))?;
    publisher.connect()?;
    publish_and_close(&mut publisher, &wrapper)?;

    println!(
        "published {} annotation(s) to {} topic(s) on {}",
        count,
        config.ledger.topics.len(),
        publisher.net_type()
    );
    Ok(())
}
