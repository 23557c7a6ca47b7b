use crate::validation::ValidationError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

const ENTITY_PATTERN: &str = r"^\d{1,19}\.\d{1,19}\.\d{1,19}(-[a-z]{5})?$";

macro_rules! entity_id {
    ($name:ident, $doc:expr, $pattern:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Parses a validated identifier from a string.
            pub fn parse(value: impl Into<String>) -> Result<Self, ValidationError> {
                let s = value.into();
                if !Regex::new($pattern).expect("invalid regex").is_match(&s) {
                    return Err(ValidationError::PatternMismatch {
                        field: stringify!($name),
                        value: s,
                    });
                }
                Ok(Self(s))
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::str::FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

entity_id!(
    AccountId,
    "Ledger account that pays for and signs transactions (`shard.realm.num`).",
    ENTITY_PATTERN
);
entity_id!(
    TopicId,
    "Append-only consensus topic (`shard.realm.num`).",
    ENTITY_PATTERN
);
entity_id!(
    ContractId,
    "Deployed contract (`shard.realm.num`).",
    ENTITY_PATTERN
);
entity_id!(
    TransactionId,
    "Transaction identifier: payer account and valid-start time (`0.0.2@1700000000.000000001`).",
    r"^\d{1,19}\.\d{1,19}\.\d{1,19}@\d{1,19}\.\d{9}$"
);

impl TransactionId {
    /// Builds a transaction id from its payer and valid-start instant.
    pub fn new(payer: &AccountId, seconds: u64, nanos: u32) -> Self {
        let payer = payer.as_str().split('-').next().unwrap_or_default();
        Self(format!("{}@{}.{:09}", payer, seconds, nanos))
    }

    /// Account that paid for the transaction.
    pub fn payer(&self) -> &str {
        self.0.split('@').next().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_ids_accept_shard_realm_num() {
        assert!(TopicId::parse("0.0.1").is_ok());
        assert!(AccountId::parse("0.0.1234-vfmkw").is_ok());
        assert!(ContractId::parse("1.2.3").is_ok());
    }

    #[test]
    fn entity_ids_reject_garbage() {
        for bad in ["", "0.0", "0.0.x", "a.b.c", "0.0.1-ABCDE", "0.0.1 "] {
            let err = TopicId::parse(bad).unwrap_err();
            assert!(err.to_string().contains("TopicId"), "{bad}: {err}");
        }
    }

    #[test]
    fn transaction_id_strips_checksum_from_payer() {
        let payer = AccountId::parse("0.0.1234-vfmkw").unwrap();
        let tx = TransactionId::new(&payer, 1_700_000_000, 42);
        assert_eq!(tx.as_str(), "0.0.1234@1700000000.000000042");
        assert_eq!(tx.payer(), "0.0.1234");
        assert_eq!(TransactionId::parse(tx.as_str()).unwrap(), tx);
    }
}
