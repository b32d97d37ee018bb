//! Query Layer - derived read-views over the snippet store
//!
//! Stateless with respect to persistence: every call issues fresh
//! queries; nothing is cached.

pub mod engine;

pub use engine::{QueryEngine, SnippetWithTags};
