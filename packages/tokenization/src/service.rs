//! Tokenize/detokenize orchestration.

use tracing::{debug, error, instrument};

use crate::error::{Result, StoreError, TokenizationError};
use crate::hash;
use crate::traits::store::MappingStore;
use crate::types::{category::Category, mapping::Mapping};
use crate::validators;

/// Caller identity stamped on mappings when none is configured.
pub const DEFAULT_CREATED_BY: &str = "tokenization";

/// Deterministic tokenization of sensitive values.
///
/// Holds no state of its own beyond the store handle, so a single instance
/// can serve concurrent callers. Both operations are plain `async fn`s;
/// cancellation and timeouts are driven by the caller, and a cancelled
/// tokenize cannot leave a partial write because the store insert is a
/// single atomic row.
pub struct TokenizationService<S> {
    store: S,
    created_by: String,
}

impl<S: MappingStore> TokenizationService<S> {
    /// Create a service over a mapping store.
    pub fn new(store: S) -> Self {
        Self {
            store,
            created_by: DEFAULT_CREATED_BY.to_string(),
        }
    }

    /// Set the caller identity recorded on inserted mappings.
    pub fn with_created_by(mut self, created_by: impl Into<String>) -> Self {
        self.created_by = created_by.into();
        self
    }

    /// Tokenize a sensitive value.
    ///
    /// Validates the plaintext for its category, then returns the existing
    /// token if one is stored, or derives and persists a new one. Repeated
    /// calls for the same `(plaintext, category)` are idempotent: at most
    /// one mapping is ever written.
    #[instrument(skip_all, fields(category = %category))]
    pub async fn tokenize(&self, plaintext: &str, category: Category) -> Result<String> {
        match category {
            Category::IdNumber => {
                if !validators::is_valid_identity_number(plaintext) {
                    return Err(TokenizationError::InvalidFormat { category });
                }
            }
            Category::Phone => {
                if !validators::is_valid_phone_number(plaintext) {
                    return Err(TokenizationError::InvalidFormat { category });
                }
            }
            Category::UserName | Category::Password => {
                return Err(TokenizationError::UnsupportedCategory { category });
            }
        }

        let existing = self.store.find_by_plaintext(plaintext, category).await?;
        match existing.as_slice() {
            [] => self.insert_new(plaintext, category).await,
            [mapping] => Ok(mapping.token.clone()),
            _ => {
                error!(
                    %category,
                    matches = existing.len(),
                    "multiple mappings for one plaintext key"
                );
                Err(TokenizationError::AmbiguousMapping { category })
            }
        }
    }

    /// Resolve a token back to its plaintext.
    ///
    /// Never writes.
    #[instrument(skip_all, fields(category = %category))]
    pub async fn detokenize(&self, token: &str, category: Category) -> Result<String> {
        let matches = self.store.find_by_token(token, category).await?;
        match matches.as_slice() {
            [] => Err(TokenizationError::NotFound),
            [mapping] => Ok(mapping.plaintext.clone()),
            _ => {
                error!(
                    %category,
                    matches = matches.len(),
                    "multiple mappings for one token key"
                );
                Err(TokenizationError::AmbiguousMapping { category })
            }
        }
    }

    /// Derive and persist a mapping for a first-seen value.
    ///
    /// Lookup-then-insert is not atomic, so a concurrent caller may insert
    /// the same key between our lookup and our insert. The store's
    /// uniqueness constraint turns that into a `Conflict`, and the winning
    /// row is re-queried once and returned. Anything but exactly one row on
    /// re-query means the append-only invariant does not hold.
    async fn insert_new(&self, plaintext: &str, category: Category) -> Result<String> {
        let token = hash::digest_token(plaintext);
        let mapping = Mapping::new(plaintext, token.clone(), category, self.created_by.clone());

        match self.store.insert(&mapping).await {
            Ok(()) => Ok(token),
            Err(StoreError::Conflict) => {
                debug!(%category, "insert lost a first-write race, re-querying winner");
                let rows = self.store.find_by_plaintext(plaintext, category).await?;
                match rows.as_slice() {
                    [winner] => Ok(winner.token.clone()),
                    _ => {
                        error!(
                            %category,
                            matches = rows.len(),
                            "re-query after insert conflict did not find one winner"
                        );
                        Err(TokenizationError::AmbiguousMapping { category })
                    }
                }
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::*;
    use crate::error::StoreResult;
    use crate::stores::MemoryStore;

    const PHONE: &str = "13800138000";
    const ID_NUMBER: &str = "11010519491231002X";

    fn service() -> TokenizationService<MemoryStore> {
        TokenizationService::new(MemoryStore::new())
    }

    #[tokio::test]
    async fn tokenize_is_idempotent() {
        let store = Arc::new(MemoryStore::new());
        let svc = TokenizationService::new(store.clone());

        let first = svc.tokenize(PHONE, Category::Phone).await.unwrap();
        let second = svc.tokenize(PHONE, Category::Phone).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn round_trip_phone() {
        let svc = service();
        let token = svc.tokenize(PHONE, Category::Phone).await.unwrap();
        let plaintext = svc.detokenize(&token, Category::Phone).await.unwrap();
        assert_eq!(plaintext, PHONE);
    }

    #[tokio::test]
    async fn round_trip_identity_number() {
        let svc = service();
        let token = svc.tokenize(ID_NUMBER, Category::IdNumber).await.unwrap();
        let plaintext = svc.detokenize(&token, Category::IdNumber).await.unwrap();
        assert_eq!(plaintext, ID_NUMBER);
    }

    #[tokio::test]
    async fn rejects_malformed_phone() {
        let svc = service();
        let result = svc.tokenize("12345", Category::Phone).await;
        assert!(matches!(
            result,
            Err(TokenizationError::InvalidFormat {
                category: Category::Phone
            })
        ));
    }

    #[tokio::test]
    async fn rejects_identity_number_with_bad_check_character() {
        let svc = service();
        let result = svc.tokenize("110105194912310021", Category::IdNumber).await;
        assert!(matches!(
            result,
            Err(TokenizationError::InvalidFormat {
                category: Category::IdNumber
            })
        ));
    }

    #[tokio::test]
    async fn rejects_untokenizable_categories() {
        let svc = service();
        for category in [Category::UserName, Category::Password] {
            let result = svc.tokenize("anything", category).await;
            assert!(matches!(
                result,
                Err(TokenizationError::UnsupportedCategory { .. })
            ));
        }
    }

    #[tokio::test]
    async fn detokenize_unknown_token_is_not_found() {
        let svc = service();
        let result = svc.detokenize("not-a-real-token", Category::Phone).await;
        assert!(matches!(result, Err(TokenizationError::NotFound)));
    }

    #[tokio::test]
    async fn detokenize_is_scoped_by_category() {
        let svc = service();
        let token = svc.tokenize(PHONE, Category::Phone).await.unwrap();
        let result = svc.detokenize(&token, Category::IdNumber).await;
        assert!(matches!(result, Err(TokenizationError::NotFound)));
    }

    #[tokio::test]
    async fn scenario_phone_tokenize_then_detokenize() {
        let svc = service();

        let token = svc.tokenize(PHONE, Category::Phone).await.unwrap();
        let again = svc.tokenize(PHONE, Category::Phone).await.unwrap();
        assert_eq!(token, again);

        assert_eq!(svc.detokenize(&token, Category::Phone).await.unwrap(), PHONE);
        assert!(matches!(
            svc.detokenize("not-a-real-token", Category::Phone).await,
            Err(TokenizationError::NotFound)
        ));
    }

    #[tokio::test]
    async fn duplicate_plaintext_rows_surface_as_ambiguous() {
        let store = Arc::new(MemoryStore::new());
        store.insert_unchecked(Mapping::new(PHONE, "t1", Category::Phone, "tests"));
        store.insert_unchecked(Mapping::new(PHONE, "t2", Category::Phone, "tests"));

        let svc = TokenizationService::new(store);
        let result = svc.tokenize(PHONE, Category::Phone).await;
        assert!(matches!(
            result,
            Err(TokenizationError::AmbiguousMapping {
                category: Category::Phone
            })
        ));
    }

    #[tokio::test]
    async fn duplicate_token_rows_surface_as_ambiguous() {
        let store = Arc::new(MemoryStore::new());
        store.insert_unchecked(Mapping::new("13800138000", "t1", Category::Phone, "tests"));
        store.insert_unchecked(Mapping::new("13900139000", "t1", Category::Phone, "tests"));

        let svc = TokenizationService::new(store);
        let result = svc.detokenize("t1", Category::Phone).await;
        assert!(matches!(
            result,
            Err(TokenizationError::AmbiguousMapping {
                category: Category::Phone
            })
        ));
    }

    #[tokio::test]
    async fn concurrent_first_time_tokenize_converges_on_one_row() {
        let store = Arc::new(MemoryStore::new());
        let svc = Arc::new(TokenizationService::new(store.clone()));

        let a = tokio::spawn({
            let svc = svc.clone();
            async move { svc.tokenize(PHONE, Category::Phone).await }
        });
        let b = tokio::spawn({
            let svc = svc.clone();
            async move { svc.tokenize(PHONE, Category::Phone).await }
        });

        let token_a = a.await.unwrap().unwrap();
        let token_b = b.await.unwrap().unwrap();

        assert_eq!(token_a, token_b);
        assert_eq!(store.len(), 1);
    }

    /// Store wrapper that reports "no rows" for the first N plaintext
    /// lookups, forcing the lookup-miss-then-insert-conflict path that a
    /// real concurrent race produces.
    struct StaleReadStore {
        inner: MemoryStore,
        stale_reads: AtomicUsize,
    }

    impl StaleReadStore {
        fn new(stale_reads: usize) -> Self {
            Self {
                inner: MemoryStore::new(),
                stale_reads: AtomicUsize::new(stale_reads),
            }
        }
    }

    #[async_trait]
    impl MappingStore for StaleReadStore {
        async fn find_by_plaintext(
            &self,
            plaintext: &str,
            category: Category,
        ) -> StoreResult<Vec<Mapping>> {
            let remaining = self.stale_reads.load(Ordering::SeqCst);
            if remaining > 0 {
                self.stale_reads.store(remaining - 1, Ordering::SeqCst);
                return Ok(Vec::new());
            }
            self.inner.find_by_plaintext(plaintext, category).await
        }

        async fn find_by_token(
            &self,
            token: &str,
            category: Category,
        ) -> StoreResult<Vec<Mapping>> {
            self.inner.find_by_token(token, category).await
        }

        async fn insert(&self, mapping: &Mapping) -> StoreResult<()> {
            self.inner.insert(mapping).await
        }
    }

    #[tokio::test]
    async fn insert_conflict_returns_the_winning_token() {
        let store = Arc::new(StaleReadStore::new(1));
        let winner = Mapping::new(PHONE, hash::digest_token(PHONE), Category::Phone, "tests");
        store.inner.insert(&winner).await.unwrap();

        // Stale lookup misses the winner, the insert conflicts, and the
        // re-query must return the winner's token instead of an error.
        let svc = TokenizationService::new(store.clone());
        let token = svc.tokenize(PHONE, Category::Phone).await.unwrap();

        assert_eq!(token, winner.token);
        assert_eq!(store.inner.len(), 1);
    }

    #[tokio::test]
    async fn missing_winner_after_conflict_is_ambiguous() {
        // Both the lookup and the post-conflict re-query come back empty,
        // which cannot happen under the append-only invariant.
        let store = Arc::new(StaleReadStore::new(2));
        let winner = Mapping::new(PHONE, hash::digest_token(PHONE), Category::Phone, "tests");
        store.inner.insert(&winner).await.unwrap();

        let svc = TokenizationService::new(store);
        let result = svc.tokenize(PHONE, Category::Phone).await;
        assert!(matches!(
            result,
            Err(TokenizationError::AmbiguousMapping {
                category: Category::Phone
            })
        ));
    }
}
