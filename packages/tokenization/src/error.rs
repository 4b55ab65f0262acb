//! Typed errors for the tokenization library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.
//!
//! Error messages never carry plaintext or token values; callers get the
//! error kind plus the offending category and build their own user-facing
//! message from that.

use thiserror::Error;

use crate::types::category::Category;

/// Errors that can occur during tokenize/detokenize operations.
#[derive(Debug, Error)]
pub enum TokenizationError {
    /// Input failed category-specific format validation.
    ///
    /// Recoverable: the caller can fix the input and retry.
    #[error("invalid {category} format")]
    InvalidFormat { category: Category },

    /// The category is not tokenizable by this service.
    #[error("category not supported for tokenization: {category}")]
    UnsupportedCategory { category: Category },

    /// More than one mapping matched a key that must be unique.
    ///
    /// A store invariant has been violated. This is surfaced as a fault
    /// for operator attention, never resolved by picking an arbitrary row.
    #[error("ambiguous mapping for {category}: uniqueness invariant violated")]
    AmbiguousMapping { category: Category },

    /// No mapping exists for the given token.
    #[error("no mapping found for token")]
    NotFound,

    /// Storage operation failed.
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
}

/// Errors reported by `MappingStore` implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Insert violated a store-enforced uniqueness constraint.
    ///
    /// The service distinguishes this from backend faults: a conflict on a
    /// first-time insert means a concurrent writer won the race, and the
    /// winning row is re-queried instead of failing the call.
    #[error("uniqueness conflict on insert")]
    Conflict,

    /// Backend fault (connection failure, timeout, malformed row).
    #[error("backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Result type alias for tokenization operations.
pub type Result<T> = std::result::Result<T, TokenizationError>;

/// Result type alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
