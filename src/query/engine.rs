//! Query engine implementation
//!
//! Composes read-only classification views from store primitives:
//! - Every snippet with its tags attached
//! - Snippets of one tag
//! - Untagged snippets

use crate::Result;
use crate::snippet::Snippet;
use crate::storage::SnippetStore;
use crate::tag::Tag;

/// A snippet paired with its tags, both in name order
#[derive(Debug, Clone, serde::Serialize)]
pub struct SnippetWithTags {
    pub snippet: Snippet,
    pub tags: Vec<Tag>,
}

/// Query engine for snippet classification views
pub struct QueryEngine<'a> {
    store: &'a SnippetStore,
}

impl<'a> QueryEngine<'a> {
    /// Create a new query engine
    pub fn new(store: &'a SnippetStore) -> Self {
        Self { store }
    }

    /// Every snippet (name ascending) with its tags (name ascending).
    ///
    /// One tag lookup per snippet. Fine for a personal collection; a
    /// single grouped join would be the move at larger scale.
    pub fn snippets_with_tags(&self) -> Result<Vec<SnippetWithTags>> {
        let snippets = self.store.all_snippets()?;

        let mut result = Vec::with_capacity(snippets.len());
        for snippet in snippets {
            let tags = self.store.tags_for_snippet(snippet.id)?;
            result.push(SnippetWithTags { snippet, tags });
        }

        Ok(result)
    }

    /// Snippets linked to one tag, name ascending
    pub fn snippets_by_tag(&self, tag_id: i64) -> Result<Vec<Snippet>> {
        self.store.snippets_by_tag(tag_id)
    }

    /// Snippets with no tag links, name ascending
    pub fn untagged_snippets(&self) -> Result<Vec<Snippet>> {
        self.store.untagged_snippets()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snippet::SnippetDraft;

    fn draft(name: &str) -> SnippetDraft {
        SnippetDraft::new(name, "", "rs", "fn main() {}")
    }

    #[test]
    fn test_snippets_with_tags_groups_and_sorts() {
        let mut store = SnippetStore::open_in_memory().unwrap();

        let zebra = store.insert_tag("zebra").unwrap();
        let alpha = store.insert_tag("alpha").unwrap();

        store.save_snippet(&draft("Second"), &[zebra, alpha]).unwrap();
        store.save_snippet(&draft("First"), &[]).unwrap();

        let engine = QueryEngine::new(&store);
        let all = engine.snippets_with_tags().unwrap();

        assert_eq!(all.len(), 2);
        assert_eq!(all[0].snippet.name, "First");
        assert!(all[0].tags.is_empty());
        assert_eq!(all[1].snippet.name, "Second");

        let tag_names: Vec<_> = all[1].tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(tag_names, vec!["alpha", "zebra"]);
    }

    #[test]
    fn test_snippets_by_tag() {
        let mut store = SnippetStore::open_in_memory().unwrap();

        let tag = store.insert_tag("sorting").unwrap();
        let other = store.insert_tag("other").unwrap();
        store.save_snippet(&draft("Quick Sort"), &[tag]).unwrap();
        store.save_snippet(&draft("Merge Sort"), &[tag]).unwrap();
        store.save_snippet(&draft("Unrelated"), &[other]).unwrap();

        let engine = QueryEngine::new(&store);
        let names: Vec<_> = engine
            .snippets_by_tag(tag)
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Merge Sort", "Quick Sort"]);
    }

    #[test]
    fn test_untagged_bucket() {
        let mut store = SnippetStore::open_in_memory().unwrap();

        let tag = store.insert_tag("tagged").unwrap();
        store.save_snippet(&draft("Tagged"), &[tag]).unwrap();
        store.save_snippet(&draft("Loose"), &[]).unwrap();

        let engine = QueryEngine::new(&store);
        let untagged = engine.untagged_snippets().unwrap();
        assert_eq!(untagged.len(), 1);
        assert_eq!(untagged[0].name, "Loose");
    }

    #[test]
    fn test_views_idempotent_without_writes() {
        let mut store = SnippetStore::open_in_memory().unwrap();

        let tag = store.insert_tag("sorting").unwrap();
        store.save_snippet(&draft("Quick Sort"), &[tag]).unwrap();
        store.save_snippet(&draft("Loose"), &[]).unwrap();

        let engine = QueryEngine::new(&store);
        let first = engine.snippets_with_tags().unwrap();
        let second = engine.snippets_with_tags().unwrap();

        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.snippet, b.snippet);
            assert_eq!(a.tags, b.tags);
        }
    }
}
