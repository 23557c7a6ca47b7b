use thiserror::Error;

/// Validation errors for ledger identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// When a value does not match the required pattern.
    #[error("{field} ('{value}') is not allowed")]
    PatternMismatch {
        /// Identifier type that failed validation.
        field: &'static str,
        /// Offending value.
        value: String,
    },
}
