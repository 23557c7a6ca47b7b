use canonical_json::to_string;
use serde_json::Value;
use std::fmt;

use crate::annotation::Annotation;

/// Annotation fields that signatures do not cover.
///
/// `signature` cannot cover itself. `deviceId` is attached by the attestation
/// annotator only after signing, so it is transport metadata rather than part
/// of the signed claim.
pub const UNSIGNED_FIELDS: [&str; 2] = ["signature", "deviceId"];

/// Error returned when canonicalization fails.
#[derive(thiserror::Error, Debug)]
pub enum CanonicalizationError {
    /// Value could not be converted to JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    /// Value is not a JSON object.
    #[error("invalid JSON structure: {0}")]
    InvalidStructure(String),
    /// Non-finite number (NaN/Infinity) detected.
    #[error("non-finite number detected at {0}")]
    NonFiniteNumber(String),
    /// RFC 8785 encoder failure.
    #[error("other error: {0}")]
    Other(String),
}

/// Helper for building JSON paths during validation.
#[derive(Debug, Clone)]
struct Path {
    segments: Vec<String>,
}

impl Path {
    fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    fn push_field(&self, field: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(field.to_string());
        Self { segments }
    }

    fn push_index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(format!("[{}]", index));
        Self { segments }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            write!(f, "root")
        } else {
            write!(f, "{}", self.segments.join("."))
        }
    }
}

/// Produces RFC 8785 canonical bytes for a JSON value.
pub fn canonical_bytes(value: &Value) -> Result<Vec<u8>, CanonicalizationError> {
    validate(value, Path::root())?;
    let canonical =
        to_string(value).map_err(|err| CanonicalizationError::Other(err.to_string()))?;
    Ok(canonical.into_bytes())
}

/// Produces the canonical bytes an annotation signature covers.
///
/// The annotation is serialized to its JSON record form, the
/// [`UNSIGNED_FIELDS`] are removed, and the remainder is canonicalized. The
/// result is independent of whether the annotation is already signed.
pub fn signing_payload(annotation: &Annotation) -> Result<Vec<u8>, CanonicalizationError> {
    let mut value = serde_json::to_value(annotation)?;
    let Value::Object(map) = &mut value else {
        return Err(CanonicalizationError::InvalidStructure(
            "annotation did not serialize to an object".to_string(),
        ));
    };
    for field in UNSIGNED_FIELDS {
        map.remove(field);
    }
    canonical_bytes(&value)
}

fn validate(value: &Value, path: Path) -> Result<(), CanonicalizationError> {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                validate(child, path.push_field(key))?;
            }
            Ok(())
        }
        Value::Array(items) => {
            for (idx, item) in items.iter().enumerate() {
                validate(item, path.push_index(idx))?;
            }
            Ok(())
        }
        Value::Number(num) => match num.as_f64() {
            Some(f) if num.is_f64() && !f.is_finite() => {
                Err(CanonicalizationError::NonFiniteNumber(path.to_string()))
            }
            _ => Ok(()),
        },
        Value::String(_) | Value::Bool(_) | Value::Null => Ok(()),
    }
}
