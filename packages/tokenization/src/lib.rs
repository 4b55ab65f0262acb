//! Deterministic Tokenization Library
//!
//! Replaces sensitive values (phone numbers, national identity numbers)
//! with stable surrogate tokens, persisting each plaintext-token mapping
//! exactly once and resolving tokens back to plaintext on demand.
//!
//! # Design
//!
//! - Tokens are a pure function of the plaintext, so re-tokenizing a value
//!   is idempotent and never writes a second row.
//! - Uniqueness of `(plaintext, category)` and `(token, category)` is
//!   enforced by the store; the service reconciles lost first-insert races
//!   by re-querying the winning row instead of surfacing a conflict.
//! - Category-specific format validation (weighted-checksum identity
//!   numbers, mobile phone pattern) rejects malformed input before any
//!   token is derived.
//!
//! # Usage
//!
//! ```rust,ignore
//! use tokenization::{Category, MemoryStore, TokenizationService};
//!
//! let service = TokenizationService::new(MemoryStore::new());
//!
//! let token = service.tokenize("13800138000", Category::Phone).await?;
//! let plaintext = service.detokenize(&token, Category::Phone).await?;
//! assert_eq!(plaintext, "13800138000");
//! ```
//!
//! # Modules
//!
//! - [`service`] - Tokenize/detokenize orchestration
//! - [`traits`] - Storage abstraction ([`MappingStore`])
//! - [`stores`] - Storage implementations (MemoryStore, PostgresStore)
//! - [`types`] - Categories and the persisted mapping entity
//! - [`validators`] - Identity-number checksum and phone pattern
//! - [`hash`] - Deterministic token digest

pub mod error;
pub mod hash;
pub mod service;
pub mod stores;
pub mod traits;
pub mod types;
pub mod validators;

// Re-export core types at crate root
pub use error::{Result, StoreError, StoreResult, TokenizationError};
pub use service::TokenizationService;
pub use traits::store::MappingStore;
pub use types::{category::Category, mapping::Mapping};

// Re-export stores
pub use stores::MemoryStore;

#[cfg(feature = "postgres")]
pub use stores::PostgresStore;
