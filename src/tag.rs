//! Tag type - a named label for categorizing snippets
//!
//! Tags are many-to-many with snippets. Names are unique across tags,
//! enforced by the schema.

use serde::{Deserialize, Serialize};

/// A named label used to categorize snippets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Unique identifier, assigned by the store on creation
    pub id: i64,
    /// Unique tag name
    pub name: String,
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
