use std::sync::Arc;

use ledgermark_annotators::{verify_annotation, Annotator, RemoteTpmAnnotator, RequestContext, StaticHost};
use ledgermark_contracts::{derive_hash, HashType};
use proptest::prelude::*;

const SEED: &str = "9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60";
const PUBLIC: &str = "d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a";

fn hash_type() -> impl Strategy<Value = HashType> {
    prop_oneof![
        Just(HashType::Sha256),
        Just(HashType::Blake3),
        Just(HashType::None)
    ]
}

proptest! {
    #[test]
    fn derive_hash_is_deterministic(alg in hash_type(), data in proptest::collection::vec(any::<u8>(), 0..256)) {
        prop_assert_eq!(derive_hash(alg, &data), derive_hash(alg, &data));
    }

    #[test]
    fn remote_tpm_never_errors(data in proptest::collection::vec(any::<u8>(), 0..200)) {
        let annotator = RemoteTpmAnnotator::new(HashType::Sha256, SEED, Arc::new(StaticHost::new("h")));
        let annotation = annotator.annotate(&RequestContext::new(), &data).unwrap();
        prop_assert!(verify_annotation(PUBLIC, &annotation).unwrap());
    }

    #[test]
    fn tampering_breaks_verification(
        data in proptest::collection::vec(any::<u8>(), 0..64),
        host in "[a-z]{1,12}",
        field in 0usize..3,
    ) {
        let annotator = RemoteTpmAnnotator::new(HashType::Sha256, SEED, Arc::new(StaticHost::new(host)));
        let mut annotation = annotator.annotate(&RequestContext::new(), &data).unwrap();
        match field {
            0 => annotation.key.push('0'),
            1 => annotation.host.push('x'),
            _ => annotation.is_satisfied = !annotation.is_satisfied,
        }
        prop_assert!(!verify_annotation(PUBLIC, &annotation).unwrap());
    }
}
