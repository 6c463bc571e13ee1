//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent business rule violations when building members.
/// These are independent of storage and CLI concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("member name must not be empty")]
    EmptyName,

    #[error("wealth must be between 1 and 5, got {0}")]
    WealthOutOfRange(i64),

    #[error("invalid birth date '{value}': expected YYYY-MM-DD")]
    InvalidBirthDate { value: String },
}
