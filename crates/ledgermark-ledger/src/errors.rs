use ledgermark_contracts::{TopicId, TransactionId, ValidationError};
use thiserror::Error;

use crate::client::ReceiptStatus;
use crate::local::JournalError;

/// Errors reported by ledger clients.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// The ledger could not be reached or rejected the request.
    #[error("ledger request failed: {0}")]
    Network(String),
    /// A transaction was attempted before an operator account was set.
    #[error("no operator account set")]
    OperatorNotSet,
    /// The client was used after `close`.
    #[error("ledger client is closed")]
    Closed,
    /// No receipt exists for the transaction.
    #[error("unknown transaction {0}")]
    UnknownTransaction(TransactionId),
    /// Local journal storage failed.
    #[error("journal error: {0}")]
    Journal(#[from] JournalError),
}

/// Errors returned by [`Publisher`](crate::Publisher) operations.
#[derive(Error, Debug)]
pub enum PublishError {
    /// Publisher configuration is invalid; no publisher was built.
    #[error("invalid ledger configuration: {0}")]
    Configuration(String),
    /// A configured topic identifier does not parse.
    #[error("invalid topic: {0}")]
    InvalidTopic(#[from] ValidationError),
    /// A topic submit, contract execute or receipt fetch failed.
    #[error(transparent)]
    Network(#[from] LedgerError),
    /// The proof-of-record receipt reported a non-success status after the
    /// topic commit succeeded. The commit stands without its proof.
    #[error(
        "proof of record for {transaction_id} on topic {topic} failed with status {status}; \
         the topic message remains committed"
    )]
    LedgerConsistency {
        /// Topic holding the committed message.
        topic: TopicId,
        /// Transaction that committed the message.
        transaction_id: TransactionId,
        /// Status reported by the contract execution receipt.
        status: ReceiptStatus,
    },
    /// The envelope could not be serialized.
    #[error("failed to serialize publish wrapper: {0}")]
    Serialization(#[from] serde_json::Error),
    /// The publisher was used after `close`.
    #[error("publisher is closed")]
    Closed,
}
