//! The persisted plaintext-token mapping.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::category::Category;

/// A stored link between a sensitive plaintext value and its token.
///
/// Mappings are append-only: `plaintext`, `token` and `category` are never
/// mutated after insert, and rows are never deleted by the normal path.
/// The update columns exist only for out-of-band administrative correction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mapping {
    /// Surrogate key, assigned at construction
    pub id: Uuid,

    /// Original sensitive value
    pub plaintext: String,

    /// Deterministic token derived from the plaintext
    pub token: String,

    /// Category scoping the uniqueness of plaintext and token
    pub category: Category,

    /// When the mapping was first written
    pub created_at: DateTime<Utc>,

    /// Caller identity that wrote the mapping
    pub created_by: String,

    /// Set only by administrative correction, never by this library
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,

    /// Set only by administrative correction, never by this library
    #[serde(default)]
    pub updated_by: Option<String>,
}

impl Mapping {
    /// Create a new mapping, stamped with the current time.
    pub fn new(
        plaintext: impl Into<String>,
        token: impl Into<String>,
        category: Category,
        created_by: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            plaintext: plaintext.into(),
            token: token.into(),
            category,
            created_at: Utc::now(),
            created_by: created_by.into(),
            updated_at: None,
            updated_by: None,
        }
    }
}
