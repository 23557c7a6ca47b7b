use ed25519_dalek::SigningKey;
use ledgermark_contracts::{AccountId, ContractId, TopicId, TransactionId};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::LedgerError;

/// Contract function invoked to record proof of a topic commit.
pub const PROOF_FUNCTION: &str = "publish";

/// Execution budget for the proof-of-record call.
pub const PROOF_GAS: u64 = 100_000;

/// Status code reported by a receipt.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReceiptStatus {
    /// The transaction reached consensus and executed.
    Success,
    /// Any other ledger status code.
    Failure(String),
}

impl ReceiptStatus {
    /// Wire form of [`ReceiptStatus::Success`].
    pub const SUCCESS: &'static str = "SUCCESS";

    /// Whether this is the success status.
    pub fn is_success(&self) -> bool {
        matches!(self, ReceiptStatus::Success)
    }
}

impl From<String> for ReceiptStatus {
    fn from(code: String) -> Self {
        if code == Self::SUCCESS {
            ReceiptStatus::Success
        } else {
            ReceiptStatus::Failure(code)
        }
    }
}

impl From<ReceiptStatus> for String {
    fn from(status: ReceiptStatus) -> Self {
        status.to_string()
    }
}

impl fmt::Display for ReceiptStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReceiptStatus::Success => f.write_str(Self::SUCCESS),
            ReceiptStatus::Failure(code) => f.write_str(code),
        }
    }
}

/// Confirmation record for a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    /// Transaction the receipt confirms.
    pub transaction_id: TransactionId,
    /// Outcome reported by the ledger.
    pub status: ReceiptStatus,
}

/// Contract function invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractCall {
    /// Function name.
    pub function: String,
    /// String arguments, in order.
    pub args: Vec<String>,
    /// Execution-resource budget.
    pub gas: u64,
}

impl ContractCall {
    /// The fixed call that records `committed` as proof of a topic commit.
    pub fn proof_of_record(committed: &TransactionId) -> Self {
        Self {
            function: PROOF_FUNCTION.to_string(),
            args: vec![committed.to_string()],
            gas: PROOF_GAS,
        }
    }
}

/// Connection to an append-only ledger.
///
/// Every call is a blocking round trip. Implementations are a single shared
/// mutable resource; callers serialize access through `&mut self`.
pub trait LedgerClient {
    /// Sets the account that pays for and signs subsequent transactions.
    fn set_operator(&mut self, account: AccountId, key: SigningKey);

    /// Appends `message` to `topic` and returns the committing transaction.
    fn submit_message(
        &mut self,
        topic: &TopicId,
        message: &[u8],
    ) -> Result<TransactionId, LedgerError>;

    /// Invokes a contract function and returns the executing transaction.
    fn execute_contract(
        &mut self,
        contract: &ContractId,
        call: &ContractCall,
    ) -> Result<TransactionId, LedgerError>;

    /// Fetches the receipt of a transaction submitted through this client.
    fn get_receipt(&mut self, transaction: &TransactionId) -> Result<Receipt, LedgerError>;

    /// Releases the connection. No other call is valid afterwards.
    fn close(&mut self) -> Result<(), LedgerError>;
}
