use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use ledgermark_annotators::{
    annotator_for, verify_annotation, Annotator, AnnotatorError, AnnotatorSettings,
    AttestationAnnotator, HostIdentity, RemoteTpmAnnotator, RequestContext, StaticHost,
};
use ledgermark_contracts::{derive_hash, AnnotationKind, HashType};

const SEED: &str = "9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60";
const PUBLIC: &str = "d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a";

const VALID_QUOTE: [u8; 113] = [
    255, 84, 67, 71, 128, 24, 0, 34, 0, 11, 178, 247, 234, 144, 84, 235, 92, 112, 28, 229, 84,
    210, 2, 184, 175, 218, 188, 204, 2, 139, 114, 251, 175, 123, 91, 82, 179, 24, 142, 127, 67,
    101, 0, 0, 0, 0, 0, 0, 0, 0, 0, 97, 0, 0, 0, 29, 0, 0, 0, 0, 1, 32, 23, 6, 25, 0, 22, 54, 54,
    0, 0, 0, 1, 0, 4, 3, 128, 0, 0, 0, 32, 222, 71, 201, 178, 126, 184, 211, 0, 219, 181, 242,
    195, 83, 230, 50, 195, 147, 38, 44, 240, 99, 64, 196, 250, 127, 27, 64, 196, 203, 211, 111,
    144,
];

const INVALID_QUOTE: [u8; 19] = [
    230, 50, 195, 147, 38, 44, 240, 99, 64, 196, 250, 127, 27, 64, 196, 203, 211, 111, 144,
];

/// Host identity that counts lookups, to observe whether annotation work ran.
#[derive(Default)]
struct CountingHost {
    calls: AtomicUsize,
}

impl HostIdentity for CountingHost {
    fn hostname(&self) -> String {
        self.calls.fetch_add(1, Ordering::SeqCst);
        "edge-01".to_string()
    }
}

fn host() -> Arc<dyn HostIdentity> {
    Arc::new(StaticHost::new("edge-01"))
}

#[test]
fn attestation_is_satisfied_and_carries_device_id() {
    let annotator = AttestationAnnotator::new(HashType::Sha256, SEED, host());
    let annotation = annotator
        .annotate(&RequestContext::with_device_id("foo"), b"foo")
        .unwrap();

    assert!(annotation.is_satisfied);
    assert_eq!(annotation.device_id.as_deref(), Some("foo"));
    assert_eq!(annotation.kind, AnnotationKind::Attestation);
    assert_eq!(annotation.key, derive_hash(HashType::Sha256, b"foo"));
    assert_eq!(annotation.host, "edge-01");
    assert_eq!(annotation.signature.len(), 128);
    assert!(verify_annotation(PUBLIC, &annotation).unwrap());
}

#[test]
fn attestation_without_device_id_fails_before_any_work() {
    let counting = Arc::new(CountingHost::default());
    // A malformed key would surface as a signing error if signing were reached.
    let annotator = AttestationAnnotator::new(HashType::Sha256, "bad-key", counting.clone());

    for data in [&b""[..], b"foo", &VALID_QUOTE[..]] {
        let err = annotator.annotate(&RequestContext::new(), data).unwrap_err();
        assert!(matches!(err, AnnotatorError::MissingContextValue("deviceId")));
    }
    assert_eq!(counting.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn attestation_signature_does_not_cover_device_id() {
    let annotator = AttestationAnnotator::new(HashType::Sha256, SEED, host());
    let mut annotation = annotator
        .annotate(&RequestContext::with_device_id("foo"), b"foo")
        .unwrap();
    annotation.device_id = Some("someone-else".into());
    assert!(verify_annotation(PUBLIC, &annotation).unwrap());
}

#[test]
fn remote_tpm_outcomes() {
    let annotator = RemoteTpmAnnotator::new(HashType::Sha256, SEED, host());
    let ctx = RequestContext::with_device_id("foo");

    let cases: [(&str, &[u8], bool); 4] = [
        ("nil attest data input", &[], false),
        ("empty attest data input", b"", false),
        ("valid attest data input", &VALID_QUOTE, true),
        ("invalid attest data input", &INVALID_QUOTE, false),
    ];
    for (name, data, expected) in cases {
        let annotation = annotator
            .annotate(&ctx, data)
            .unwrap_or_else(|e| panic!("{name}: unexpected error {e}"));
        assert_eq!(annotation.is_satisfied, expected, "{name}");
        assert!(verify_annotation(PUBLIC, &annotation).unwrap(), "{name}");
        assert!(annotation.device_id.is_none(), "{name}");
    }
}

#[test]
fn remote_tpm_rejects_truncated_quote() {
    let annotator = RemoteTpmAnnotator::new(HashType::Blake3, SEED, host());
    let truncated = &VALID_QUOTE[..VALID_QUOTE.len() - 1];
    let annotation = annotator.annotate(&RequestContext::new(), truncated).unwrap();
    assert!(!annotation.is_satisfied);
    assert_eq!(annotation.hash_type, HashType::Blake3);
    assert!(verify_annotation(PUBLIC, &annotation).unwrap());
}

#[test]
fn remote_tpm_accepts_padded_quote() {
    let annotator = RemoteTpmAnnotator::new(HashType::Sha256, SEED, host());
    let mut padded = VALID_QUOTE.to_vec();
    padded.push(0x00);
    let annotation = annotator.annotate(&RequestContext::new(), &padded).unwrap();
    assert!(annotation.is_satisfied);
}

#[test]
fn remote_tpm_rejects_unsupported_attestations() {
    let annotator = RemoteTpmAnnotator::new(HashType::Sha256, SEED, host());

    // TPM_ST_ATTEST_TIME: a well-formed header followed by time info.
    let mut time = VALID_QUOTE[..6].to_vec();
    time[4..6].copy_from_slice(&0x8019u16.to_be_bytes());
    time.extend_from_slice(&[0, 0, 0, 0]);
    time.extend_from_slice(&[0u8; 17 + 8]);
    time.extend_from_slice(&[0u8; 8 + 17 + 8]);

    // TPM_ST_ATTEST_CERTIFY whose signer name uses hash algorithm 0x1234.
    let mut certify = VALID_QUOTE[..4].to_vec();
    certify.extend_from_slice(&0x8017u16.to_be_bytes());
    certify.extend_from_slice(&[0, 3, 0x12, 0x34, 0x01]);
    certify.extend_from_slice(&[0, 0]);
    certify.extend_from_slice(&[0u8; 17 + 8]);
    certify.extend_from_slice(&[0, 0, 0, 0]);

    for data in [time, certify] {
        let annotation = annotator.annotate(&RequestContext::new(), &data).unwrap();
        assert!(!annotation.is_satisfied);
        assert!(verify_annotation(PUBLIC, &annotation).unwrap());
    }
}

#[test]
fn remote_tpm_with_bad_key_is_a_signing_error() {
    let annotator = RemoteTpmAnnotator::new(HashType::Sha256, "00", host());
    let err = annotator
        .annotate(&RequestContext::new(), &VALID_QUOTE)
        .unwrap_err();
    assert!(matches!(err, AnnotatorError::Signing(_)));
}

#[test]
fn registry_builds_matching_kinds() {
    let settings = AnnotatorSettings {
        hash: HashType::Sha256,
        private_key: SEED.to_string(),
    };
    for kind in [AnnotationKind::Attestation, AnnotationKind::RemoteTpm] {
        let annotator = annotator_for(kind, &settings, host());
        assert_eq!(annotator.kind(), kind);
        let annotation = annotator
            .annotate(&RequestContext::with_device_id("d"), b"data")
            .unwrap();
        assert_eq!(annotation.kind, kind);
    }
    assert!(!format!("{settings:?}").contains(SEED));
}
