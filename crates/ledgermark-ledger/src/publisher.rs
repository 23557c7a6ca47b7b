//! Publisher lifecycle and the two-phase publish protocol.

use ledgermark_contracts::{
    parse_private_key, AccountId, ContractId, LedgerConfig, NetType, PublishWrapper, TopicId,
    TransactionId,
};
use tracing::{debug, error, info};

use crate::client::{ContractCall, LedgerClient};
use crate::errors::{LedgerError, PublishError};

/// Uniform lifecycle of a ledger publisher.
pub trait Publisher {
    /// Prepares the publisher for use. Idempotent.
    fn connect(&mut self) -> Result<(), PublishError>;

    /// Publishes one envelope to every configured topic, in order.
    fn publish(&mut self, message: &PublishWrapper) -> Result<(), PublishError>;

    /// Releases the ledger connection. Terminal once it succeeds; after a
    /// failure the publisher stays open and `close` may be retried.
    fn close(&mut self) -> Result<(), PublishError>;
}

/// Publishes `message`, then closes `publisher` whatever the outcome.
///
/// A publish error is reported in preference to a close error, so a
/// [`PublishError::LedgerConsistency`] is never hidden by a failed release.
pub fn publish_and_close<P: Publisher>(
    publisher: &mut P,
    message: &PublishWrapper,
) -> Result<(), PublishError> {
    let published = publisher.publish(message);
    let closed = publisher.close();
    published?;
    closed
}

/// How each topic commit is confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishMode {
    /// The topic commit is the whole publication.
    SingleCommit,
    /// Each commit is followed by a `publish` call on `contract` carrying the
    /// commit's transaction id, and its receipt must report success.
    ProofOfRecord {
        /// Contract recording the proofs.
        contract: ContractId,
    },
}

/// Lifecycle states of a [`LedgerPublisher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublisherState {
    /// Built; the client is already connected.
    Constructed,
    /// `connect` was called.
    Connected,
    /// `close` succeeded; no further publishing is possible.
    Closed,
}

/// Publishes envelopes to ledger topics through a [`LedgerClient`].
///
/// Within one `publish` call topics are handled strictly in configured
/// order and the first failure aborts the call. Earlier topics stay
/// committed; nothing reports which ones succeeded and nothing is retried.
///
/// In [`PublishMode::ProofOfRecord`] a commit can succeed while its proof
/// fails. The proof error is returned and logged, and the commit is left in
/// place without a compensating transaction.
pub struct LedgerPublisher<C: LedgerClient> {
    client: C,
    net_type: NetType,
    topics: Vec<String>,
    mode: PublishMode,
    state: PublisherState,
}

impl<C: LedgerClient> std::fmt::Debug for LedgerPublisher<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerPublisher")
            .field("net_type", &self.net_type)
            .field("topics", &self.topics)
            .field("mode", &self.mode)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

fn invalid(what: &str, err: impl std::fmt::Display) -> PublishError {
    PublishError::Configuration(format!("{}: {}", what, err))
}

impl<C: LedgerClient> LedgerPublisher<C> {
    /// Validates `config`, obtains a client for its network from `connect`,
    /// and installs the operator account.
    ///
    /// Topic identifiers are not parsed here; a bad topic fails the
    /// `publish` call that reaches it.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::Configuration`] for an unknown network
    /// selector, an unparsable account id, account key or contract id, or an
    /// empty topic list, and [`PublishError::Network`] if `connect` fails. No
    /// publisher exists in either case.
    pub fn new<F>(config: &LedgerConfig, connect: F) -> Result<Self, PublishError>
    where
        F: FnOnce(NetType) -> Result<C, LedgerError>,
    {
        let net_type: NetType = config
            .net_type
            .parse()
            .map_err(|e| invalid("network selector", e))?;
        let account = AccountId::parse(config.account_id.as_str())
            .map_err(|e| invalid("account id", e))?;
        let key = parse_private_key(&config.private_key).map_err(|e| invalid("account key", e))?;
        if config.topics.is_empty() {
            return Err(PublishError::Configuration(
                "at least one topic is required".to_string(),
            ));
        }
        let mode = match &config.contract_id {
            Some(id) => PublishMode::ProofOfRecord {
                contract: ContractId::parse(id.as_str()).map_err(|e| invalid("contract id", e))?,
            },
            None => PublishMode::SingleCommit,
        };

        let mut client = connect(net_type)?;
        client.set_operator(account.clone(), key);
        info!(network = %net_type, operator = %account, mode = ?mode, "ledger publisher ready");

        Ok(Self {
            client,
            net_type,
            topics: config.topics.clone(),
            mode,
            state: PublisherState::Constructed,
        })
    }

    /// Network the client is connected to.
    pub fn net_type(&self) -> NetType {
        self.net_type
    }

    /// Confirmation mode selected by the configuration.
    pub fn mode(&self) -> &PublishMode {
        &self.mode
    }

    /// Current lifecycle state.
    pub fn state(&self) -> PublisherState {
        self.state
    }

    /// Underlying ledger client.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Underlying ledger client, mutably.
    pub fn client_mut(&mut self) -> &mut C {
        &mut self.client
    }

    /// Consumes the publisher, returning the client.
    pub fn into_client(self) -> C {
        self.client
    }
}

/// Second phase of a proof-of-record publish: execute and confirm.
fn record_proof<C: LedgerClient>(
    client: &mut C,
    contract: &ContractId,
    topic: &TopicId,
    committed: &TransactionId,
) -> Result<(), PublishError> {
    let call = ContractCall::proof_of_record(committed);
    let execution = client.execute_contract(contract, &call)?;
    let receipt = client.get_receipt(&execution)?;
    if !receipt.status.is_success() {
        error!(
            %topic,
            transaction_id = %committed,
            %contract,
            execution = %execution,
            status = %receipt.status,
            "proof of record failed; topic message is committed without proof"
        );
        return Err(PublishError::LedgerConsistency {
            topic: topic.clone(),
            transaction_id: committed.clone(),
            status: receipt.status,
        });
    }
    info!(%topic, transaction_id = %committed, %contract, execution = %execution, "proof recorded");
    Ok(())
}

impl<C: LedgerClient> Publisher for LedgerPublisher<C> {
    // The client connects when it is created; this only advances the state.
    fn connect(&mut self) -> Result<(), PublishError> {
        if self.state == PublisherState::Closed {
            return Err(PublishError::Closed);
        }
        self.state = PublisherState::Connected;
        Ok(())
    }

    fn publish(&mut self, message: &PublishWrapper) -> Result<(), PublishError> {
        if self.state == PublisherState::Closed {
            return Err(PublishError::Closed);
        }
        let bytes = message.to_bytes()?;

        for topic in &self.topics {
            debug!(
                topic = topic.as_str(),
                message = %String::from_utf8_lossy(&bytes),
                "attempting publish"
            );
            let topic_id = TopicId::parse(topic.as_str())?;
            let committed = self.client.submit_message(&topic_id, &bytes)?;
            debug!(topic = %topic_id, transaction_id = %committed, "topic message committed");

            if let PublishMode::ProofOfRecord { contract } = &self.mode {
                record_proof(&mut self.client, contract, &topic_id, &committed)?;
            }
        }
        Ok(())
    }

    fn close(&mut self) -> Result<(), PublishError> {
        if self.state == PublisherState::Closed {
            return Ok(());
        }
        self.client.close()?;
        self.state = PublisherState::Closed;
        Ok(())
    }
}
