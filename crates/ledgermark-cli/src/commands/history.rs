//! History command implementation.

use chrono::SecondsFormat;
use ledgermark_contracts::{NetType, PublishWrapper, TopicId};
use ledgermark_ledger::local::{topic_messages, TopicMessageRecord};
use ledgermark_ledger::ReadMode;
use serde_json::json;
use std::path::PathBuf;

use crate::output::{format_json, print_history_header, truncate};

pub fn run(
    ledger_dir: PathBuf,
    network: NetType,
    topic: TopicId,
    json_output: bool,
    permissive: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mode = if permissive {
        ReadMode::Permissive
    } else {
        ReadMode::Strict
    };
    let messages = topic_messages(&ledger_dir, network, &topic, mode)
        .map_err(|e| format!("Failed to read ledger: {}", e))?;

    if json_output {
        let rows: Vec<_> = messages.iter().map(to_json).collect();
        println!("{}", format_json(&serde_json::Value::Array(rows)));
        return Ok(());
    }

    print_history_header();
    for message in &messages {
        let envelope = envelope(message);
        println!(
            "{:<6} {:<24} {:<40} {:<8} {}",
            message.sequence_number,
            message
                .consensus_timestamp
                .format("%Y-%m-%d %H:%M:%S%.3f")
                .to_string(),
            truncate(message.transaction_id.as_str(), 40),
            if message.verify() { "ok" } else { "BAD" },
            envelope
                .map(|w| format!("{} x{}", w.action, w.content.len()))
                .unwrap_or_else(|| "?".to_string())
        );
    }
    Ok(())
}

fn envelope(message: &TopicMessageRecord) -> Option<PublishWrapper> {
    let bytes = message.message_bytes().ok()?;
    serde_json::from_slice(&bytes).ok()
}

fn to_json(message: &TopicMessageRecord) -> serde_json::Value {
    json!({
        "sequenceNumber": message.sequence_number,
        "consensusTimestamp": message
            .consensus_timestamp
            .to_rfc3339_opts(SecondsFormat::Nanos, true),
        "transactionId": message.transaction_id.as_str(),
        "payer": message.payer.as_str(),
        "signatureValid": message.verify(),
        "envelope": envelope(message),
    })
}
