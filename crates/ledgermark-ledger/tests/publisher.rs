//! Two-phase publication against the recording ledger.

use ledgermark_contracts::{
    Annotation, AnnotationKind, ContractId, HashType, LedgerConfig, PublishWrapper, SdkAction,
    TopicId,
};
use ledgermark_ledger::{
    publish_and_close, LedgerError, LedgerPublisher, MemoryLedger, PublishError, PublishMode, Publisher,
    PublisherState, ReceiptStatus, PROOF_FUNCTION, PROOF_GAS,
};

const KEY: &str = "9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60";

fn config(topics: &[&str], contract: Option<&str>) -> LedgerConfig {
    LedgerConfig {
        net_type: "testnet".into(),
        account_id: "0.0.2".into(),
        private_key: KEY.into(),
        topics: topics.iter().map(|t| t.to_string()).collect(),
        contract_id: contract.map(str::to_string),
    }
}

fn wrapper() -> PublishWrapper {
    let annotation = Annotation::new(
        "abc",
        HashType::Sha256,
        "node-1",
        AnnotationKind::RemoteTpm,
        true,
    );
    PublishWrapper::new(SdkAction::Publish, vec![annotation])
}

fn publisher(ledger: MemoryLedger, config: &LedgerConfig) -> LedgerPublisher<MemoryLedger> {
    LedgerPublisher::new(config, |_| Ok(ledger)).unwrap()
}

#[test]
fn single_commit_submits_once_per_topic() {
    let mut p = publisher(MemoryLedger::new(), &config(&["0.0.1"], None));
    p.connect().unwrap();
    p.publish(&wrapper()).unwrap();

    let client = p.client();
    assert_eq!(client.submissions().len(), 1);
    assert_eq!(client.submissions()[0].topic.as_str(), "0.0.1");
    assert_eq!(client.submissions()[0].message, wrapper().to_bytes().unwrap());
    assert!(client.executions().is_empty());
    assert!(client.receipt_requests().is_empty());
}

#[test]
fn envelope_carries_action_and_message_type() {
    let mut p = publisher(MemoryLedger::new(), &config(&["0.0.1"], None));
    p.publish(&wrapper()).unwrap();
    let sent: serde_json::Value =
        serde_json::from_slice(&p.client().submissions()[0].message).unwrap();
    assert_eq!(sent["action"], "publish");
    assert_eq!(sent["messageType"], "AnnotationList");
    assert_eq!(sent["content"][0]["kind"], "remote-tpm");
}

#[test]
fn topics_are_published_in_configured_order() {
    let mut p = publisher(MemoryLedger::new(), &config(&["0.0.3", "0.0.1", "0.0.2"], None));
    p.publish(&wrapper()).unwrap();
    let order: Vec<&str> = p
        .client()
        .submissions()
        .iter()
        .map(|s| s.topic.as_str())
        .collect();
    assert_eq!(order, ["0.0.3", "0.0.1", "0.0.2"]);
}

#[test]
fn bad_topic_aborts_after_earlier_commits() {
    let mut p = publisher(MemoryLedger::new(), &config(&["0.0.1", "bad", "0.0.3"], None));
    let err = p.publish(&wrapper()).unwrap_err();
    assert!(matches!(err, PublishError::InvalidTopic(_)), "{err}");

    let topics: Vec<&str> = p
        .client()
        .submissions()
        .iter()
        .map(|s| s.topic.as_str())
        .collect();
    assert_eq!(topics, ["0.0.1"]);
}

#[test]
fn submit_failure_stops_remaining_topics() {
    let ledger = MemoryLedger::new().fail_submits_to(TopicId::parse("0.0.2").unwrap());
    let mut p = publisher(ledger, &config(&["0.0.1", "0.0.2", "0.0.3"], None));
    let err = p.publish(&wrapper()).unwrap_err();
    assert!(matches!(err, PublishError::Network(LedgerError::Network(_))));
    assert_eq!(p.client().submissions().len(), 1);
}

#[test]
fn proof_of_record_executes_publish_with_committed_id() {
    let mut p = publisher(MemoryLedger::new(), &config(&["0.0.1", "0.0.2"], Some("0.0.9")));
    assert_eq!(
        p.mode(),
        &PublishMode::ProofOfRecord {
            contract: ContractId::parse("0.0.9").unwrap()
        }
    );
    p.publish(&wrapper()).unwrap();

    let client = p.client();
    assert_eq!(client.submissions().len(), 2);
    assert_eq!(client.executions().len(), 2);
    for (submission, execution) in client.submissions().iter().zip(client.executions()) {
        assert_eq!(execution.contract.as_str(), "0.0.9");
        assert_eq!(execution.call.function, PROOF_FUNCTION);
        assert_eq!(execution.call.gas, PROOF_GAS);
        assert_eq!(execution.call.args, vec![submission.transaction_id.to_string()]);
    }
    let executed: Vec<_> = client
        .executions()
        .iter()
        .map(|e| e.transaction_id.clone())
        .collect();
    assert_eq!(client.receipt_requests(), executed.as_slice());
}

#[test]
fn failed_proof_reports_status_and_keeps_commit() {
    let ledger = MemoryLedger::new().with_contract_status(ReceiptStatus::Failure("failure".into()));
    let mut p = publisher(ledger, &config(&["0.0.1", "0.0.2"], Some("0.0.9")));
    let err = p.publish(&wrapper()).unwrap_err();

    assert!(err.to_string().contains("failure"), "{err}");
    match &err {
        PublishError::LedgerConsistency {
            topic,
            transaction_id,
            status,
        } => {
            assert_eq!(topic.as_str(), "0.0.1");
            assert_eq!(transaction_id, &p.client().submissions()[0].transaction_id);
            assert_eq!(status, &ReceiptStatus::Failure("failure".into()));
        }
        other => panic!("unexpected error: {other}"),
    }
    let client = p.client();
    assert_eq!(client.submissions().len(), 1);
    assert_eq!(client.executions().len(), 1);
    assert_eq!(client.receipt_requests().len(), 1);
}

#[test]
fn execute_failure_leaves_commit_standing() {
    let ledger = MemoryLedger::new().fail_executions("connection reset");
    let mut p = publisher(ledger, &config(&["0.0.1"], Some("0.0.9")));
    let err = p.publish(&wrapper()).unwrap_err();
    assert!(err.to_string().contains("connection reset"), "{err}");
    assert_eq!(p.client().submissions().len(), 1);
    assert!(p.client().receipt_requests().is_empty());
}

#[test]
fn construction_installs_operator() {
    let p = publisher(MemoryLedger::new(), &config(&["0.0.1"], None));
    assert_eq!(p.client().operator().map(|a| a.as_str()), Some("0.0.2"));
    assert_eq!(p.state(), PublisherState::Constructed);
}

#[test]
fn invalid_configuration_is_rejected_before_connecting() {
    let mut cases = Vec::new();
    let mut c = config(&["0.0.1"], None);
    c.net_type = "devnet".into();
    cases.push(c);
    let mut c = config(&["0.0.1"], None);
    c.account_id = "alice".into();
    cases.push(c);
    let mut c = config(&["0.0.1"], None);
    c.private_key = "zz".into();
    cases.push(c);
    cases.push(config(&[], None));
    cases.push(config(&["0.0.1"], Some("not-a-contract")));

    for c in cases {
        let mut connected = false;
        let result = LedgerPublisher::new(&c, |_| {
            connected = true;
            Ok(MemoryLedger::new())
        });
        assert!(
            matches!(result, Err(PublishError::Configuration(_))),
            "{c:?}"
        );
        assert!(!connected);
    }
}

#[test]
fn connect_failure_yields_no_publisher() {
    let result = LedgerPublisher::<MemoryLedger>::new(&config(&["0.0.1"], None), |_| {
        Err(LedgerError::Network("unreachable".into()))
    });
    assert!(matches!(result, Err(PublishError::Network(_))));
}

#[test]
fn close_is_terminal_and_idempotent() {
    let mut p = publisher(MemoryLedger::new(), &config(&["0.0.1"], None));
    p.connect().unwrap();
    assert_eq!(p.state(), PublisherState::Connected);
    p.close().unwrap();
    p.close().unwrap();
    assert_eq!(p.state(), PublisherState::Closed);
    assert!(p.client().is_closed());

    assert!(matches!(p.publish(&wrapper()), Err(PublishError::Closed)));
    assert!(matches!(p.connect(), Err(PublishError::Closed)));
    assert!(p.client().submissions().is_empty());
}

#[test]
fn failed_close_can_be_retried() {
    let ledger = MemoryLedger::new().fail_close("socket busy");
    let mut p = publisher(ledger, &config(&["0.0.1"], None));
    p.connect().unwrap();

    let err = p.close().unwrap_err();
    assert!(err.to_string().contains("socket busy"), "{err}");
    assert_eq!(p.state(), PublisherState::Connected);
    assert!(!p.client().is_closed());

    p.client_mut().recover_close();
    p.close().unwrap();
    assert_eq!(p.state(), PublisherState::Closed);
    assert!(p.client().is_closed());
    assert_eq!(p.client().close_attempts(), 2);
}

#[test]
fn publish_error_wins_over_close_error() {
    let ledger = MemoryLedger::new()
        .with_contract_status(ReceiptStatus::Failure("failure".into()))
        .fail_close("socket busy");
    let mut p = publisher(ledger, &config(&["0.0.1"], Some("0.0.9")));
    p.connect().unwrap();

    let err = publish_and_close(&mut p, &wrapper()).unwrap_err();
    assert!(
        matches!(err, PublishError::LedgerConsistency { .. }),
        "{err}"
    );
    assert_eq!(p.client().close_attempts(), 1);
}

#[test]
fn publish_and_close_reports_close_failure_after_success() {
    let ledger = MemoryLedger::new().fail_close("socket busy");
    let mut p = publisher(ledger, &config(&["0.0.1"], None));

    let err = publish_and_close(&mut p, &wrapper()).unwrap_err();
    assert!(matches!(err, PublishError::Network(_)), "{err}");
    assert_eq!(p.client().submissions().len(), 1);
}
