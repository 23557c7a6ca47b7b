//! File-backed ledger: one append-only journal per network.
//!
//! Each network lives in `<dir>/<network>.lml`. Topic messages and contract
//! executions are appended as framed JSON records; opening a ledger replays
//! the journal to rebuild topic sequence numbers and receipts.

/// Journal error types.
pub mod errors;
/// Journal header and frame codec.
pub mod frame;
/// Sequential journal reader.
pub mod reader;
/// Journal record types.
pub mod record;
/// Append-only journal writer.
pub mod writer;

pub use errors::JournalError;
pub use reader::{JournalReader, ReadMode};
pub use record::{ContractExecutionRecord, LedgerRecord, TopicMessageRecord};
pub use writer::{JournalWriter, WriteOptions};

use chrono::{DateTime, Utc};
use ed25519_dalek::SigningKey;
use ledgermark_contracts::{AccountId, ContractId, NetType, TopicId, TransactionId};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::client::{ContractCall, LedgerClient, Receipt, ReceiptStatus, PROOF_FUNCTION};
use crate::errors::LedgerError;

/// Journal file extension.
pub const JOURNAL_EXTENSION: &str = "lml";

/// Status for a proof referencing a transaction that committed no topic message.
pub const INVALID_TRANSACTION_ID: &str = "INVALID_TRANSACTION_ID";
/// Status for a call to a function the contract does not expose.
pub const CONTRACT_REVERT_EXECUTED: &str = "CONTRACT_REVERT_EXECUTED";
/// Status for a call with no execution budget.
pub const INSUFFICIENT_GAS: &str = "INSUFFICIENT_GAS";

/// Location of the journal for `net` under `dir`.
pub fn journal_path(dir: &Path, net: NetType) -> PathBuf {
    dir.join(format!("{}.{}", net.as_str(), JOURNAL_EXTENSION))
}

/// Reads every record of the journal for `net` under `dir`.
///
/// A journal that does not exist yet has no records.
pub fn read_records(
    dir: &Path,
    net: NetType,
    mode: ReadMode,
) -> Result<Vec<LedgerRecord>, JournalError> {
    let path = journal_path(dir, net);
    if !path.exists() {
        return Ok(Vec::new());
    }
    let mut reader = JournalReader::open(&path, mode)?;
    let mut records = Vec::new();
    while let Some(record) = reader.read_record()? {
        records.push(record);
    }
    Ok(records)
}

/// Topic messages of `topic` in sequence order.
pub fn topic_messages(
    dir: &Path,
    net: NetType,
    topic: &TopicId,
    mode: ReadMode,
) -> Result<Vec<TopicMessageRecord>, JournalError> {
    Ok(read_records(dir, net, mode)?
        .into_iter()
        .filter_map(|record| match record {
            LedgerRecord::TopicMessage(m) if &m.topic_id == topic => Some(m),
            _ => None,
        })
        .collect())
}

/// Ledger client persisting to a local journal.
pub struct LocalLedger {
    path: PathBuf,
    writer: Option<JournalWriter>,
    operator: Option<(AccountId, SigningKey)>,
    sequences: HashMap<TopicId, u64>,
    committed: HashSet<TransactionId>,
    receipts: HashMap<TransactionId, ReceiptStatus>,
    last_valid_start: (u64, u32),
}

impl std::fmt::Debug for LocalLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalLedger")
            .field("path", &self.path)
            .field("operator", &self.operator.as_ref().map(|(account, _)| account))
            .field("closed", &self.writer.is_none())
            .finish_non_exhaustive()
    }
}

impl LocalLedger {
    /// Opens the ledger for `net` under `dir`, creating both as needed.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError`] if the directory or journal cannot be
    /// created, or an existing journal is corrupt or truncated.
    pub fn open(dir: impl AsRef<Path>, net: NetType) -> Result<Self, JournalError> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let path = journal_path(dir, net);

        let mut ledger = Self {
            path: path.clone(),
            writer: None,
            operator: None,
            sequences: HashMap::new(),
            committed: HashSet::new(),
            receipts: HashMap::new(),
            last_valid_start: (0, 0),
        };
        for record in read_records(dir, net, ReadMode::Strict)? {
            ledger.apply(&record);
        }
        ledger.writer = Some(JournalWriter::open(&path, WriteOptions::default())?);
        debug!(
            path = %path.display(),
            transactions = ledger.receipts.len(),
            "local ledger opened"
        );
        Ok(ledger)
    }

    /// Journal file backing this ledger.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of messages committed to `topic`.
    pub fn topic_len(&self, topic: &TopicId) -> u64 {
        self.sequences.get(topic).copied().unwrap_or(0)
    }

    fn apply(&mut self, record: &LedgerRecord) {
        let transaction_id = record.transaction_id().clone();
        if let Some(start) = valid_start(&transaction_id) {
            self.last_valid_start = self.last_valid_start.max(start);
        }
        match record {
            LedgerRecord::TopicMessage(m) => {
                let seq = self.sequences.entry(m.topic_id.clone()).or_insert(0);
                *seq = (*seq).max(m.sequence_number);
                self.committed.insert(transaction_id.clone());
                self.receipts.insert(transaction_id, ReceiptStatus::Success);
            }
            LedgerRecord::ContractExecution(e) => {
                self.receipts.insert(transaction_id, e.status.clone());
            }
        }
    }

    fn operator(&self) -> Result<(&AccountId, &SigningKey), LedgerError> {
        if self.writer.is_none() {
            return Err(LedgerError::Closed);
        }
        self.operator
            .as_ref()
            .map(|(account, key)| (account, key))
            .ok_or(LedgerError::OperatorNotSet)
    }

    /// Issues a transaction id whose valid start is strictly later than any
    /// seen so far, even when the clock does not advance.
    fn next_transaction(&mut self, payer: &AccountId, now: DateTime<Utc>) -> TransactionId {
        let candidate = (now.timestamp().max(0) as u64, now.timestamp_subsec_nanos() % 1_000_000_000);
        let start = if candidate > self.last_valid_start {
            candidate
        } else {
            let (secs, nanos) = self.last_valid_start;
            if nanos >= 999_999_999 {
                (secs + 1, 0)
            } else {
                (secs, nanos + 1)
            }
        };
        self.last_valid_start = start;
        TransactionId::new(payer, start.0, start.1)
    }

    fn append(&mut self, record: LedgerRecord) -> Result<(), LedgerError> {
        let writer = self.writer.as_mut().ok_or(LedgerError::Closed)?;
        writer.append(&record)?;
        self.apply(&record);
        Ok(())
    }

    fn evaluate(&self, call: &ContractCall) -> ReceiptStatus {
        if call.function != PROOF_FUNCTION {
            return ReceiptStatus::Failure(CONTRACT_REVERT_EXECUTED.to_string());
        }
        if call.gas == 0 {
            return ReceiptStatus::Failure(INSUFFICIENT_GAS.to_string());
        }
        let proven = match call.args.as_slice() {
            [arg] => TransactionId::parse(arg.as_str())
                .map(|tx| self.committed.contains(&tx))
                .unwrap_or(false),
            _ => false,
        };
        if proven {
            ReceiptStatus::Success
        } else {
            ReceiptStatus::Failure(INVALID_TRANSACTION_ID.to_string())
        }
    }
}

fn valid_start(transaction: &TransactionId) -> Option<(u64, u32)> {
    let (_, start) = transaction.as_str().split_once('@')?;
    let (secs, nanos) = start.split_once('.')?;
    Some((secs.parse().ok()?, nanos.parse().ok()?))
}

impl LedgerClient for LocalLedger {
    fn set_operator(&mut self, account: AccountId, key: SigningKey) {
        self.operator = Some((account, key));
    }

    fn submit_message(
        &mut self,
        topic: &TopicId,
        message: &[u8],
    ) -> Result<TransactionId, LedgerError> {
        let (payer, key) = self.operator()?;
        let (payer, key) = (payer.clone(), key.clone());
        let now = Utc::now();
        let transaction_id = self.next_transaction(&payer, now);
        let sequence_number = self.topic_len(topic) + 1;
        let record = TopicMessageRecord::sign(
            topic.clone(),
            sequence_number,
            transaction_id.clone(),
            payer,
            now,
            message,
            &key,
        );
        self.append(LedgerRecord::TopicMessage(record))?;
        debug!(%topic, sequence_number, %transaction_id, "topic message appended");
        Ok(transaction_id)
    }

    fn execute_contract(
        &mut self,
        contract: &ContractId,
        call: &ContractCall,
    ) -> Result<TransactionId, LedgerError> {
        let (payer, _) = self.operator()?;
        let payer = payer.clone();
        let now = Utc::now();
        let transaction_id = self.next_transaction(&payer, now);
        let status = self.evaluate(call);
        let record = ContractExecutionRecord {
            contract_id: contract.clone(),
            transaction_id: transaction_id.clone(),
            payer,
            consensus_timestamp: now,
            call: call.clone(),
            status,
        };
        self.append(LedgerRecord::ContractExecution(record))?;
        debug!(%contract, function = call.function.as_str(), %transaction_id, "contract executed");
        Ok(transaction_id)
    }

    fn get_receipt(&mut self, transaction: &TransactionId) -> Result<Receipt, LedgerError> {
        if self.writer.is_none() {
            return Err(LedgerError::Closed);
        }
        let status = self
            .receipts
            .get(transaction)
            .cloned()
            .ok_or_else(|| LedgerError::UnknownTransaction(transaction.clone()))?;
        Ok(Receipt {
            transaction_id: transaction.clone(),
            status,
        })
    }

    fn close(&mut self) -> Result<(), LedgerError> {
        if let Some(writer) = self.writer.take() {
            writer.finish()?;
        }
        Ok(())
    }
}
