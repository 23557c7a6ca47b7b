//! Output formatting utilities.

use serde_json::Value;

/// Formats a value as pretty JSON.
pub fn format_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

/// Prints the topic history table header.
#[allow(clippy::print_literal)]
pub fn print_history_header() {
    println!(
        "{:<6} {:<24} {:<40} {:<8} {}",
        "SEQ", "CONSENSUS", "TRANSACTION", "SIGNED", "ENVELOPE"
    );
    println!("{}", "-".repeat(96));
}

pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len.saturating_sub(3)])
    }
}
