use base64::Engine;
use chrono::{DateTime, Utc};
use ed25519_dalek::{Signature, SigningKey, Verifier, VerifyingKey};
use ledgermark_contracts::{AccountId, ContractId, TopicId, TransactionId};
use serde::{Deserialize, Serialize};

use crate::client::{ContractCall, ReceiptStatus};

/// A message appended to a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicMessageRecord {
    /// Topic the message belongs to.
    pub topic_id: TopicId,
    /// Position in the topic, starting at 1.
    pub sequence_number: u64,
    /// Committing transaction.
    pub transaction_id: TransactionId,
    /// Account that paid for the transaction.
    pub payer: AccountId,
    /// Consensus time of the commit.
    pub consensus_timestamp: DateTime<Utc>,
    /// Message bytes, base64 encoded.
    pub message: String,
    /// Hex Ed25519 public key of the payer.
    pub signer: String,
    /// Hex Ed25519 signature of the payer over the message bytes.
    pub signature: String,
}

impl TopicMessageRecord {
    pub(crate) fn sign(
        topic_id: TopicId,
        sequence_number: u64,
        transaction_id: TransactionId,
        payer: AccountId,
        consensus_timestamp: DateTime<Utc>,
        message: &[u8],
        key: &SigningKey,
    ) -> Self {
        use ed25519_dalek::Signer;
        Self {
            topic_id,
            sequence_number,
            transaction_id,
            payer,
            consensus_timestamp,
            message: base64::engine::general_purpose::STANDARD.encode(message),
            signer: hex::encode(key.verifying_key().to_bytes()),
            signature: hex::encode(key.sign(message).to_bytes()),
        }
    }

    /// Decoded message bytes.
    pub fn message_bytes(&self) -> Result<Vec<u8>, base64::DecodeError> {
        base64::engine::general_purpose::STANDARD.decode(&self.message)
    }

    /// Whether `signature` is the payer's signature over the message.
    pub fn verify(&self) -> bool {
        let Ok(message) = self.message_bytes() else {
            return false;
        };
        let Some(key) = hex::decode(&self.signer)
            .ok()
            .and_then(|b| <[u8; 32]>::try_from(b).ok())
            .and_then(|b| VerifyingKey::from_bytes(&b).ok())
        else {
            return false;
        };
        let Some(signature) = hex::decode(&self.signature)
            .ok()
            .and_then(|b| Signature::from_slice(&b).ok())
        else {
            return false;
        };
        key.verify(&message, &signature).is_ok()
    }
}

/// A contract function execution and its outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractExecutionRecord {
    /// Contract invoked.
    pub contract_id: ContractId,
    /// Executing transaction.
    pub transaction_id: TransactionId,
    /// Account that paid for the transaction.
    pub payer: AccountId,
    /// Consensus time of the execution.
    pub consensus_timestamp: DateTime<Utc>,
    /// Invocation.
    pub call: ContractCall,
    /// Receipt status.
    pub status: ReceiptStatus,
}

/// One decoded journal entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerRecord {
    /// Topic message frame.
    TopicMessage(TopicMessageRecord),
    /// Contract execution frame.
    ContractExecution(ContractExecutionRecord),
}

impl LedgerRecord {
    /// Transaction that produced the record.
    pub fn transaction_id(&self) -> &TransactionId {
        match self {
            LedgerRecord::TopicMessage(record) => &record.transaction_id,
            LedgerRecord::ContractExecution(record) => &record.transaction_id,
        }
    }
}
