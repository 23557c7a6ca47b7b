//! Publication of annotation envelopes to an append-only ledger.
//!
//! This crate provides:
//! - The [`LedgerClient`] collaborator trait (topic submit, contract execute, receipts)
//! - [`LedgerPublisher`], committing to every configured topic in order and, when a
//!   contract is configured, recording proof of each commit through a contract call
//! - [`MemoryLedger`], an in-process client that records every call
//! - [`LocalLedger`], a file-backed client storing an append-only framed journal
//!
//! ## Failure window
//!
//! A topic commit is final. If the proof-of-record call that follows it fails,
//! the commit is not rolled back and nothing is retried: the error reaches the
//! caller and the ledger keeps a message without its proof.
//!
//! ## Quick Start
//!
//! ```rust
//! use ledgermark_contracts::{LedgerConfig, PublishWrapper, SdkAction};
//! use ledgermark_ledger::{LedgerPublisher, MemoryLedger, Publisher};
//!
//! let config = LedgerConfig {
//!     net_type: "testnet".into(),
//!     account_id: "0.0.2".into(),
//!     private_key: "9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60".into(),
//!     topics: vec!["0.0.1".into()],
//!     contract_id: None,
//! };
//! let mut publisher = LedgerPublisher::new(&config, |_| Ok(MemoryLedger::new()))?;
//! publisher.connect()?;
//! publisher.publish(&PublishWrapper::new(SdkAction::Create, vec![]))?;
//! publisher.close()?;
//! assert_eq!(publisher.client().submissions().len(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(missing_docs)]

/// Ledger client collaborator trait and receipt types.
pub mod client;
/// Error types for ledger operations.
pub mod errors;
/// File-backed local ledger.
pub mod local;
/// In-memory recording ledger.
pub mod memory;
/// Publisher lifecycle and the two-phase publish protocol.
pub mod publisher;

pub use client::{ContractCall, LedgerClient, Receipt, ReceiptStatus, PROOF_FUNCTION, PROOF_GAS};
pub use errors::{LedgerError, PublishError};
pub use local::{LocalLedger, ReadMode};
pub use memory::MemoryLedger;
pub use publisher::{publish_and_close, LedgerPublisher, PublishMode, Publisher, PublisherState};
