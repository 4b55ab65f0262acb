//! Sensitive-data categories.

use serde::{Deserialize, Serialize};

/// Kind of sensitive value a mapping belongs to.
///
/// The set is closed: uniqueness of plaintext and token values is scoped
/// per category, so the same string may be stored under two different
/// categories without conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    /// Mobile phone number (11 digits, pattern-validated)
    Phone,
    /// Display or login name (not tokenizable by this service)
    UserName,
    /// National identity number (checksum-validated)
    IdNumber,
    /// Credential value (not tokenizable by this service)
    Password,
}

impl Category {
    /// Stable string form, used for persistence and log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Phone => "PHONE",
            Category::UserName => "USER_NAME",
            Category::IdNumber => "ID_NUMBER",
            Category::Password => "PASSWORD",
        }
    }

    /// Parse the stable string form back into a category.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "PHONE" => Some(Category::Phone),
            "USER_NAME" => Some(Category::UserName),
            "ID_NUMBER" => Some(Category::IdNumber),
            "PASSWORD" => Some(Category::Password),
            _ => None,
        }
    }

    /// Whether this service tokenizes values of this category at all.
    pub fn is_tokenizable(&self) -> bool {
        matches!(self, Category::Phone | Category::IdNumber)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
