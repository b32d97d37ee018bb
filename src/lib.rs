//! # Snipboard - Personal Code-Snippet Manager
//!
//! Tag-organized snippet storage backed by SQLite.
//!
//! Snipboard provides:
//! - A relational snippet store (snippets, tags, many-to-many links)
//! - Transactional snippet saves with referential integrity
//! - Free-text search scoped by language
//! - Derived views: snippets grouped by tag, untagged snippets
//! - Usage counting for insert/copy actions

pub mod config;
pub mod query;
pub mod snippet;
pub mod storage;
pub mod tag;
pub mod ui;

// Re-exports for convenient access
pub use query::{QueryEngine, SnippetWithTags};
pub use snippet::{Snippet, SnippetDraft};
pub use storage::SnippetStore;
pub use tag::Tag;

/// Result type alias for Snipboard operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Snipboard operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(rusqlite::Error),

    #[error("Query failed: {0}")]
    Query(rusqlite::Error),

    #[error("Write failed: {0}")]
    Write(rusqlite::Error),

    #[error("Tag link insert failed (tag {tag_id}): {source}")]
    LinkInsertion {
        tag_id: i64,
        source: rusqlite::Error,
    },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
