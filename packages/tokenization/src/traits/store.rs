//! Storage trait for plaintext-token mappings.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::types::{category::Category, mapping::Mapping};

/// Durable store of plaintext-token mappings.
///
/// Implementations must enforce uniqueness of `(plaintext, category)` and
/// `(token, category)` at insert time and report a violation as
/// `StoreError::Conflict`. That constraint is what makes concurrent
/// first-time tokenization of the same value safe: the service performs a
/// non-atomic lookup-then-insert, and exactly one of two racing inserts
/// succeeds.
///
/// Both lookups return every matching row rather than a single one, so the
/// service can detect a violated invariant (more than one match) instead of
/// silently picking a row.
#[async_trait]
pub trait MappingStore: Send + Sync {
    /// Find mappings by plaintext value within a category.
    async fn find_by_plaintext(
        &self,
        plaintext: &str,
        category: Category,
    ) -> StoreResult<Vec<Mapping>>;

    /// Find mappings by token value within a category.
    async fn find_by_token(&self, token: &str, category: Category) -> StoreResult<Vec<Mapping>>;

    /// Insert a new mapping.
    ///
    /// Must be atomic per row and fail with `StoreError::Conflict` when a
    /// uniqueness constraint is violated.
    async fn insert(&self, mapping: &Mapping) -> StoreResult<()>;
}

// Blanket implementation so a store can be shared across tasks
#[async_trait]
impl<S: MappingStore + ?Sized> MappingStore for Arc<S> {
    async fn find_by_plaintext(
        &self,
        plaintext: &str,
        category: Category,
    ) -> StoreResult<Vec<Mapping>> {
        (**self).find_by_plaintext(plaintext, category).await
    }

    async fn find_by_token(&self, token: &str, category: Category) -> StoreResult<Vec<Mapping>> {
        (**self).find_by_token(token, category).await
    }

    async fn insert(&self, mapping: &Mapping) -> StoreResult<()> {
        (**self).insert(mapping).await
    }
}
