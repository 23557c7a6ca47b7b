use ed25519_dalek::SigningKey;
use ledgermark_contracts::{AccountId, ContractId, TopicId, TransactionId};
use std::collections::{HashMap, HashSet};

use crate::client::{ContractCall, LedgerClient, Receipt, ReceiptStatus};
use crate::errors::LedgerError;

/// Valid-start second of the first transaction a [`MemoryLedger`] issues.
const GENESIS_SECONDS: u64 = 1_700_000_000;

/// A message the ledger accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    /// Topic the message was appended to.
    pub topic: TopicId,
    /// Message bytes.
    pub message: Vec<u8>,
    /// Committing transaction.
    pub transaction_id: TransactionId,
}

/// A contract call the ledger accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Execution {
    /// Target contract.
    pub contract: ContractId,
    /// Invocation.
    pub call: ContractCall,
    /// Executing transaction.
    pub transaction_id: TransactionId,
}

/// In-process ledger client that records every call.
///
/// Failures are injected per operation: submits to chosen topics, contract
/// executions, `close`, or the status contract receipts report.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    operator: Option<AccountId>,
    issued: u32,
    submissions: Vec<Submission>,
    executions: Vec<Execution>,
    receipt_requests: Vec<TransactionId>,
    receipts: HashMap<TransactionId, ReceiptStatus>,
    failing_topics: HashSet<TopicId>,
    execute_failure: Option<String>,
    contract_status: Option<ReceiptStatus>,
    close_failure: Option<String>,
    close_attempts: usize,
    closed: bool,
}

impl MemoryLedger {
    /// Creates an empty ledger that accepts everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects submits to `topic` with a network error.
    pub fn fail_submits_to(mut self, topic: TopicId) -> Self {
        self.failing_topics.insert(topic);
        self
    }

    /// Rejects every contract execution with a network error.
    pub fn fail_executions(mut self, reason: impl Into<String>) -> Self {
        self.execute_failure = Some(reason.into());
        self
    }

    /// Makes contract execution receipts report `status`.
    pub fn with_contract_status(mut self, status: ReceiptStatus) -> Self {
        self.contract_status = Some(status);
        self
    }

    /// Rejects every `close` with a network error.
    pub fn fail_close(mut self, reason: impl Into<String>) -> Self {
        self.close_failure = Some(reason.into());
        self
    }

    /// Makes later `close` calls succeed again.
    pub fn recover_close(&mut self) {
        self.close_failure = None;
    }

    /// Number of `close` calls, failed ones included.
    pub fn close_attempts(&self) -> usize {
        self.close_attempts
    }

    /// Operator account, once set.
    pub fn operator(&self) -> Option<&AccountId> {
        self.operator.as_ref()
    }

    /// Accepted topic messages, in order.
    pub fn submissions(&self) -> &[Submission] {
        &self.submissions
    }

    /// Accepted contract calls, in order.
    pub fn executions(&self) -> &[Execution] {
        &self.executions
    }

    /// Transactions whose receipts were requested, in order.
    pub fn receipt_requests(&self) -> &[TransactionId] {
        &self.receipt_requests
    }

    /// Whether `close` was called.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn next_transaction(&mut self) -> Result<TransactionId, LedgerError> {
        if self.closed {
            return Err(LedgerError::Closed);
        }
        let payer = self.operator.as_ref().ok_or(LedgerError::OperatorNotSet)?;
        self.issued += 1;
        Ok(TransactionId::new(payer, GENESIS_SECONDS, self.issued))
    }
}

impl LedgerClient for MemoryLedger {
    fn set_operator(&mut self, account: AccountId, _key: SigningKey) {
        self.operator = Some(account);
    }

    fn submit_message(
        &mut self,
        topic: &TopicId,
        message: &[u8],
    ) -> Result<TransactionId, LedgerError> {
        if self.failing_topics.contains(topic) {
            return Err(LedgerError::Network(format!("submit to {} rejected", topic)));
        }
        let transaction_id = self.next_transaction()?;
        self.receipts
            .insert(transaction_id.clone(), ReceiptStatus::Success);
        self.submissions.push(Submission {
            topic: topic.clone(),
            message: message.to_vec(),
            transaction_id: transaction_id.clone(),
        });
        Ok(transaction_id)
    }

    fn execute_contract(
        &mut self,
        contract: &ContractId,
        call: &ContractCall,
    ) -> Result<TransactionId, LedgerError> {
        if let Some(reason) = &self.execute_failure {
            return Err(LedgerError::Network(reason.clone()));
        }
        let transaction_id = self.next_transaction()?;
        let status = self
            .contract_status
            .clone()
            .unwrap_or(ReceiptStatus::Success);
        self.receipts.insert(transaction_id.clone(), status);
        self.executions.push(Execution {
            contract: contract.clone(),
            call: call.clone(),
            transaction_id: transaction_id.clone(),
        });
        Ok(transaction_id)
    }

    fn get_receipt(&mut self, transaction: &TransactionId) -> Result<Receipt, LedgerError> {
        if self.closed {
            return Err(LedgerError::Closed);
        }
        self.receipt_requests.push(transaction.clone());
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
        self.close_attempts += 1;
        if let Some(reason) = &self.close_failure {
            return Err(LedgerError::Network(reason.clone()));
        }
        self.closed = true;
        Ok(())
    }
}
