//! In-memory storage implementation for testing and development.

use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::{StoreError, StoreResult};
use crate::traits::store::MappingStore;
use crate::types::{category::Category, mapping::Mapping};

/// In-memory mapping store.
///
/// Useful for testing and development. Not suitable for production as data
/// is lost on restart. Enforces the same uniqueness constraints a durable
/// backend declares on `(plaintext, category)` and `(token, category)`.
pub struct MemoryStore {
    rows: RwLock<Vec<Mapping>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
        }
    }

    /// Get the number of stored mappings.
    pub fn len(&self) -> usize {
        self.rows.read().unwrap().len()
    }

    /// Whether the store holds no mappings.
    pub fn is_empty(&self) -> bool {
        self.rows.read().unwrap().is_empty()
    }

    /// Clear all stored mappings.
    pub fn clear(&self) {
        self.rows.write().unwrap().clear();
    }

    /// Insert a mapping without uniqueness enforcement.
    ///
    /// Exists so tests can seed invariant-violating state (duplicate rows
    /// for one key) and assert that the service surfaces it as a fault.
    pub fn insert_unchecked(&self, mapping: Mapping) {
        self.rows.write().unwrap().push(mapping);
    }
}

#[async_trait]
impl MappingStore for MemoryStore {
    async fn find_by_plaintext(
        &self,
        plaintext: &str,
        category: Category,
    ) -> StoreResult<Vec<Mapping>> {
        Ok(self
            .rows
            .read()
            .unwrap()
            .iter()
            .filter(|m| m.plaintext == plaintext && m.category == category)
            .cloned()
            .collect())
    }

    async fn find_by_token(&self, token: &str, category: Category) -> StoreResult<Vec<Mapping>> {
        Ok(self
            .rows
            .read()
            .unwrap()
            .iter()
            .filter(|m| m.token == token && m.category == category)
            .cloned()
            .collect())
    }

    async fn insert(&self, mapping: &Mapping) -> StoreResult<()> {
        let mut rows = self.rows.write().unwrap();

        let conflict = rows.iter().any(|m| {
            m.category == mapping.category
                && (m.plaintext == mapping.plaintext || m.token == mapping.token)
        });
        if conflict {
            return Err(StoreError::Conflict);
        }

        rows.push(mapping.clone());
        Ok(())
    }
}
