//! Domain error types.
//!
//! These errors represent validation failures of caller input. They are
//! distinct from upstream/IO errors and are never retried.

/// Domain-level validation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Reference date is not in `yyyy-MM-dd` form
    #[error("invalid date format: '{0}' (expected yyyy-MM-dd)")]
    InvalidDate(String),

    /// Not one of the 27 federative units
    #[error("invalid UF: {0}")]
    InvalidUf(String),

    /// Not a federal road code in 010..=499
    #[error("invalid BR: {0}")]
    InvalidBr(String),

    /// Not a ten-character SNV segment code
    #[error("invalid SNV code: {0}")]
    InvalidSnv(String),
}
