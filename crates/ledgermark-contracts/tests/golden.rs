use ledgermark_contracts::{
    derive_hash, signing_payload, Annotation, AnnotationKind, HashType, PublishWrapper, SdkAction,
};
use serde_json::json;

fn signed_sample() -> Annotation {
    let mut annotation = Annotation::new(
        derive_hash(HashType::Sha256, b"foo"),
        HashType::Sha256,
        "edge-01",
        AnnotationKind::Attestation,
        true,
    );
    annotation.signature = "ab".repeat(64);
    annotation
}

#[test]
fn annotation_serializes_to_record_shape() {
    let mut annotation = signed_sample();
    annotation.device_id = Some("foo".into());

    let value = serde_json::to_value(&annotation).unwrap();
    assert_eq!(
        value,
        json!({
            "key": "2c26b46b68ffc68ff99b453c1d30413413422d706483bfa0f98a5e886266e7ae",
            "hash": "sha256",
            "host": "edge-01",
            "kind": "attestation",
            "isSatisfied": true,
            "deviceId": "foo",
            "signature": "ab".repeat(64)
        })
    );
}

#[test]
fn absent_device_id_is_omitted() {
    let value = serde_json::to_value(signed_sample()).unwrap();
    assert!(value.get("deviceId").is_none());
}

#[test]
fn annotation_parses_without_optional_fields() {
    let parsed: Annotation = serde_json::from_value(json!({
        "key": "00",
        "hash": "none",
        "host": "h",
        "kind": "remote-tpm",
        "isSatisfied": false
    }))
    .unwrap();
    assert_eq!(parsed.kind, AnnotationKind::RemoteTpm);
    assert!(parsed.device_id.is_none());
    assert!(!parsed.is_signed());
}

#[test]
fn wrapper_serializes_with_annotation_list() {
    let wrapper = PublishWrapper::new(SdkAction::Create, vec![signed_sample()]);
    let value: serde_json::Value = serde_json::from_slice(&wrapper.to_bytes().unwrap()).unwrap();
    assert_eq!(value["action"], "create");
    assert_eq!(value["messageType"], "AnnotationList");
    assert_eq!(value["content"][0]["host"], "edge-01");
}

#[test]
fn signing_payload_is_stable_across_field_order() {
    let reordered: Annotation = serde_json::from_str(
        r#"{"isSatisfied":true,"kind":"attestation","host":"edge-01","hash":"sha256",
            "key":"2c26b46b68ffc68ff99b453c1d30413413422d706483bfa0f98a5e886266e7ae"}"#,
    )
    .unwrap();
    assert_eq!(
        signing_payload(&reordered).unwrap(),
        signing_payload(&signed_sample()).unwrap()
    );
}
