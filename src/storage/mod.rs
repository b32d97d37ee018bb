//! Storage Layer - SQLite-backed persistence
//!
//! System of record is SQLite with tables:
//! - Tag(id, name)
//! - Snippet(id, name, description, language, contents, folder, favorite, timesCopied)
//! - SnippetTagLink(snippetId, tagId)
//!
//! Foreign-key enforcement is enabled for the life of every connection.

pub mod schema;
pub mod sqlite;

pub use sqlite::{DbStats, SnippetStore};
