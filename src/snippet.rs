//! Snippet types - the unit of storage
//!
//! A snippet is a saved block of code with descriptive metadata and a
//! usage counter. Snippets are created once via the save operation; the
//! only post-creation mutation is the `times_copied` counter.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// A saved code snippet as read back from the store.
///
/// All fields are owned copies; the store remains the system of record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    /// Unique identifier, assigned by the store on creation
    pub id: i64,
    /// Display name (never empty)
    pub name: String,
    /// Free-form description (may be empty)
    pub description: String,
    /// Language tag, e.g. a file extension like "rs" or "py"
    pub language: String,
    /// The code itself
    pub contents: String,
    /// Reserved for future folder organization; always None at creation
    pub folder: Option<String>,
    /// Reserved favorite flag; defaults to false
    pub favorite: bool,
    /// How many times this snippet was inserted or copied
    pub times_copied: i64,
}

/// Input for saving a new snippet.
///
/// `folder`, `favorite` and `times_copied` are not part of the draft:
/// the store writes their defaults (NULL, false, 0) on every save.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnippetDraft {
    pub name: String,
    pub description: String,
    pub language: String,
    pub contents: String,
}

impl SnippetDraft {
    pub fn new(name: &str, description: &str, language: &str, contents: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            language: language.to_string(),
            contents: contents.to_string(),
        }
    }

    /// Check the invariants the store requires before any write.
    ///
    /// Name must be non-blank and contents non-empty. Description and
    /// language may be empty.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation("snippet name must not be empty".into()));
        }
        if self.contents.is_empty() {
            return Err(Error::Validation(
                "snippet contents must not be empty".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_draft_passes() {
        let draft = SnippetDraft::new("Quick Sort", "", "py", "def qs(xs): ...");
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn blank_name_rejected() {
        let draft = SnippetDraft::new("   ", "", "py", "x = 1");
        assert!(matches!(draft.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn empty_contents_rejected() {
        let draft = SnippetDraft::new("Empty", "", "py", "");
        assert!(matches!(draft.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn empty_description_and_language_allowed() {
        let draft = SnippetDraft::new("Plain", "", "", "text");
        assert!(draft.validate().is_ok());
    }
}
