//! SQLite storage implementation

use super::schema;
use crate::snippet::{Snippet, SnippetDraft};
use crate::tag::Tag;
use crate::{Error, Result};
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;

/// SQLite-backed store for snippets and tags.
///
/// One instance per process, injected into consumers. Reads take
/// `&self`; the multi-statement save takes `&mut self`, so two saves
/// cannot interleave on the same store.
#[derive(Debug)]
pub struct SnippetStore {
    conn: Connection,
}

impl SnippetStore {
    /// Open a database file (creates if doesn't exist)
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(Error::StorageUnavailable)?;
        let store = Self { conn };
        store.initialize()?;
        Ok(store)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(Error::StorageUnavailable)?;
        let store = Self { conn };
        store.initialize()?;
        Ok(store)
    }

    /// Enable foreign keys and apply the idempotent schema.
    ///
    /// SQLite enforces foreign keys per connection, so the pragma must
    /// run before any write on this connection.
    fn initialize(&self) -> Result<()> {
        self.conn
            .execute_batch("PRAGMA foreign_keys = ON")
            .map_err(Error::StorageUnavailable)?;
        for stmt in schema::all_schema_statements() {
            self.conn
                .execute(stmt, [])
                .map_err(Error::StorageUnavailable)?;
        }
        Ok(())
    }

    /// Release the connection.
    ///
    /// Close failures are logged, never raised: teardown must always
    /// complete. Consuming `self` makes double-close unrepresentable.
    pub fn close(self) {
        if let Err((_conn, e)) = self.conn.close() {
            tracing::warn!("Error closing snippet database: {}", e);
        }
    }

    // ========== Tag Operations ==========

    /// All tags, sorted by name ascending
    pub fn list_tags(&self) -> Result<Vec<Tag>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM Tag ORDER BY name ASC")
            .map_err(Error::Query)?;

        let tags = stmt
            .query_map([], Self::row_to_tag)
            .map_err(Error::Query)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(Error::Query)?;

        Ok(tags)
    }

    /// Insert a tag and return its assigned id.
    ///
    /// This is the seeding hook for the tag vocabulary; there is no
    /// rename or delete. Duplicate names are rejected by the UNIQUE
    /// constraint.
    pub fn insert_tag(&self, name: &str) -> Result<i64> {
        if name.trim().is_empty() {
            return Err(Error::Validation("tag name must not be empty".into()));
        }
        self.conn
            .execute("INSERT INTO Tag (name) VALUES (?1)", [name])
            .map_err(Error::Write)?;
        Ok(self.conn.last_insert_rowid())
    }

    // ========== Snippet Operations ==========

    /// Save a new snippet and link it to the given tags, atomically.
    ///
    /// Validates the draft before any write. The snippet insert and all
    /// link inserts run in one transaction: if any link fails (e.g. a
    /// tag id that doesn't exist), the transaction rolls back on drop
    /// and no snippet row is left behind.
    ///
    /// Returns the new snippet id. `tag_ids` may be empty.
    pub fn save_snippet(&mut self, draft: &SnippetDraft, tag_ids: &[i64]) -> Result<i64> {
        draft.validate()?;

        let tx = self.conn.transaction().map_err(Error::Write)?;

        tx.execute(
            r#"
            INSERT INTO Snippet (name, description, language, contents, folder, favorite, timesCopied)
            VALUES (?1, ?2, ?3, ?4, NULL, 0, 0)
            "#,
            params![draft.name, draft.description, draft.language, draft.contents],
        )
        .map_err(Error::Write)?;

        let snippet_id = tx.last_insert_rowid();

        for &tag_id in tag_ids {
            tx.execute(
                "INSERT INTO SnippetTagLink (snippetId, tagId) VALUES (?1, ?2)",
                params![snippet_id, tag_id],
            )
            .map_err(|e| Error::LinkInsertion { tag_id, source: e })?;
        }

        tx.commit().map_err(Error::Write)?;
        Ok(snippet_id)
    }

    /// Increment the timesCopied counter for a snippet.
    ///
    /// Touches zero rows when the id doesn't exist; that is success, not
    /// an error. Usage counting is best-effort telemetry.
    pub fn increment_times_copied(&self, snippet_id: i64) -> Result<()> {
        self.conn
            .execute(
                "UPDATE Snippet SET timesCopied = timesCopied + 1 WHERE id = ?1",
                [snippet_id],
            )
            .map_err(Error::Write)?;
        Ok(())
    }

    /// Get a snippet by id
    pub fn get_snippet_by_id(&self, snippet_id: i64) -> Result<Option<Snippet>> {
        self.conn
            .query_row(
                "SELECT id, name, description, language, contents, folder, favorite, timesCopied
                 FROM Snippet WHERE id = ?1",
                [snippet_id],
                Self::row_to_snippet,
            )
            .optional()
            .map_err(Error::Query)
    }

    /// Search snippets by name/description substring and exact language.
    ///
    /// Matching uses SQL LIKE, which in SQLite is ASCII
    /// case-insensitive. An empty query matches every snippet of the
    /// language. Sorted by name ascending.
    pub fn search_snippets(&self, query: &str, language: &str) -> Result<Vec<Snippet>> {
        let pattern = format!("%{}%", query);
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, name, description, language, contents, folder, favorite, timesCopied
                 FROM Snippet
                 WHERE (name LIKE ?1 OR description LIKE ?1) AND language = ?2
                 ORDER BY name ASC",
            )
            .map_err(Error::Query)?;

        let snippets = stmt
            .query_map(params![pattern, language], Self::row_to_snippet)
            .map_err(Error::Query)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(Error::Query)?;

        Ok(snippets)
    }

    /// All snippets, sorted by name ascending
    pub fn all_snippets(&self) -> Result<Vec<Snippet>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, name, description, language, contents, folder, favorite, timesCopied
                 FROM Snippet ORDER BY name ASC",
            )
            .map_err(Error::Query)?;

        let snippets = stmt
            .query_map([], Self::row_to_snippet)
            .map_err(Error::Query)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(Error::Query)?;

        Ok(snippets)
    }

    /// Tags linked to one snippet, sorted by tag name ascending
    pub fn tags_for_snippet(&self, snippet_id: i64) -> Result<Vec<Tag>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT t.id, t.name FROM Tag t
                 INNER JOIN SnippetTagLink stl ON t.id = stl.tagId
                 WHERE stl.snippetId = ?1
                 ORDER BY t.name ASC",
            )
            .map_err(Error::Query)?;

        let tags = stmt
            .query_map([snippet_id], Self::row_to_tag)
            .map_err(Error::Query)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(Error::Query)?;

        Ok(tags)
    }

    /// Snippets linked to one tag, sorted by name ascending
    pub fn snippets_by_tag(&self, tag_id: i64) -> Result<Vec<Snippet>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT s.id, s.name, s.description, s.language, s.contents, s.folder, s.favorite, s.timesCopied
                 FROM Snippet s
                 INNER JOIN SnippetTagLink stl ON s.id = stl.snippetId
                 WHERE stl.tagId = ?1
                 ORDER BY s.name ASC",
            )
            .map_err(Error::Query)?;

        let snippets = stmt
            .query_map([tag_id], Self::row_to_snippet)
            .map_err(Error::Query)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(Error::Query)?;

        Ok(snippets)
    }

    /// Snippets with zero link rows, sorted by name ascending
    pub fn untagged_snippets(&self) -> Result<Vec<Snippet>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, name, description, language, contents, folder, favorite, timesCopied
                 FROM Snippet
                 WHERE id NOT IN (SELECT snippetId FROM SnippetTagLink)
                 ORDER BY name ASC",
            )
            .map_err(Error::Query)?;

        let snippets = stmt
            .query_map([], Self::row_to_snippet)
            .map_err(Error::Query)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(Error::Query)?;

        Ok(snippets)
    }

    // ========== Statistics ==========

    /// Count all snippets
    pub fn count_snippets(&self) -> Result<usize> {
        self.count("SELECT COUNT(*) FROM Snippet")
    }

    /// Count all tags
    pub fn count_tags(&self) -> Result<usize> {
        self.count("SELECT COUNT(*) FROM Tag")
    }

    /// Count all snippet-tag links
    pub fn count_links(&self) -> Result<usize> {
        self.count("SELECT COUNT(*) FROM SnippetTagLink")
    }

    /// Get database statistics
    pub fn stats(&self) -> Result<DbStats> {
        Ok(DbStats {
            snippets: self.count_snippets()?,
            tags: self.count_tags()?,
            links: self.count_links()?,
        })
    }

    fn count(&self, sql: &str) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row(sql, [], |row| row.get(0))
            .map_err(Error::Query)?;
        Ok(count as usize)
    }

    // ========== Row Mapping ==========

    fn row_to_snippet(row: &rusqlite::Row) -> rusqlite::Result<Snippet> {
        Ok(Snippet {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            language: row.get(3)?,
            contents: row.get(4)?,
            folder: row.get(5)?,
            favorite: row.get(6)?,
            times_copied: row.get(7)?,
        })
    }

    fn row_to_tag(row: &rusqlite::Row) -> rusqlite::Result<Tag> {
        Ok(Tag {
            id: row.get(0)?,
            name: row.get(1)?,
        })
    }
}

/// Database statistics
#[derive(Debug, Clone)]
pub struct DbStats {
    pub snippets: usize,
    pub tags: usize,
    pub links: usize,
}

impl std::fmt::Display for DbStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Database Statistics:")?;
        writeln!(f, "  Snippets: {}", self.snippets)?;
        writeln!(f, "  Tags: {}", self.tags)?;
        writeln!(f, "  Links: {}", self.links)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_draft(name: &str, language: &str) -> SnippetDraft {
        SnippetDraft::new(name, "", language, "fn main() {}")
    }

    #[test]
    fn test_save_and_get_round_trip() {
        let mut store = SnippetStore::open_in_memory().unwrap();

        let draft = SnippetDraft::new("Quick Sort", "classic divide and conquer", "py", "def qs(xs): ...");
        let id = store.save_snippet(&draft, &[]).unwrap();

        let snippet = store.get_snippet_by_id(id).unwrap().unwrap();
        assert_eq!(snippet.id, id);
        assert_eq!(snippet.name, "Quick Sort");
        assert_eq!(snippet.description, "classic divide and conquer");
        assert_eq!(snippet.language, "py");
        assert_eq!(snippet.contents, "def qs(xs): ...");
        assert_eq!(snippet.folder, None);
        assert!(!snippet.favorite);
        assert_eq!(snippet.times_copied, 0);
    }

    #[test]
    fn test_get_missing_snippet_is_none() {
        let store = SnippetStore::open_in_memory().unwrap();
        assert!(store.get_snippet_by_id(42).unwrap().is_none());
    }

    #[test]
    fn test_save_rejects_blank_name() {
        let mut store = SnippetStore::open_in_memory().unwrap();

        let draft = SnippetDraft::new("  ", "", "py", "x = 1");
        let err = store.save_snippet(&draft, &[]).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(store.count_snippets().unwrap(), 0);
    }

    #[test]
    fn test_save_rejects_empty_contents() {
        let mut store = SnippetStore::open_in_memory().unwrap();

        let draft = SnippetDraft::new("Empty", "", "py", "");
        let err = store.save_snippet(&draft, &[]).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(store.count_snippets().unwrap(), 0);
    }

    #[test]
    fn test_save_with_tags_creates_links() {
        let mut store = SnippetStore::open_in_memory().unwrap();

        let sorting = store.insert_tag("sorting").unwrap();
        let classic = store.insert_tag("classic").unwrap();

        let id = store
            .save_snippet(&sample_draft("Quick Sort", "py"), &[sorting, classic])
            .unwrap();

        let by_sorting = store.snippets_by_tag(sorting).unwrap();
        assert_eq!(by_sorting.len(), 1);
        assert_eq!(by_sorting[0].id, id);

        let by_classic = store.snippets_by_tag(classic).unwrap();
        assert_eq!(by_classic.len(), 1);

        assert!(store.untagged_snippets().unwrap().is_empty());
        assert_eq!(store.count_links().unwrap(), 2);
    }

    #[test]
    fn test_save_with_unknown_tag_rolls_back() {
        let mut store = SnippetStore::open_in_memory().unwrap();

        let sorting = store.insert_tag("sorting").unwrap();
        let err = store
            .save_snippet(&sample_draft("Quick Sort", "py"), &[sorting, 999])
            .unwrap_err();
        assert!(matches!(err, Error::LinkInsertion { tag_id: 999, .. }));

        // The whole save rolled back: no orphan snippet, no partial links.
        assert_eq!(store.count_snippets().unwrap(), 0);
        assert_eq!(store.count_links().unwrap(), 0);
    }

    #[test]
    fn test_increment_times_copied() {
        let mut store = SnippetStore::open_in_memory().unwrap();

        let id = store.save_snippet(&sample_draft("Counted", "rs"), &[]).unwrap();
        for _ in 0..3 {
            store.increment_times_copied(id).unwrap();
        }

        let snippet = store.get_snippet_by_id(id).unwrap().unwrap();
        assert_eq!(snippet.times_copied, 3);
    }

    #[test]
    fn test_increment_missing_snippet_is_noop() {
        let store = SnippetStore::open_in_memory().unwrap();
        store.increment_times_copied(42).unwrap();
        assert_eq!(store.count_snippets().unwrap(), 0);
    }

    #[test]
    fn test_search_filters_and_sorts() {
        let mut store = SnippetStore::open_in_memory().unwrap();

        store.save_snippet(&sample_draft("Quick Sort", "py"), &[]).unwrap();
        store.save_snippet(&sample_draft("Merge Sort", "py"), &[]).unwrap();
        store.save_snippet(&sample_draft("Quick Copy", "js"), &[]).unwrap();

        let results = store.search_snippets("Sort", "py").unwrap();
        let names: Vec<_> = results.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Merge Sort", "Quick Sort"]);
    }

    #[test]
    fn test_search_matches_description() {
        let mut store = SnippetStore::open_in_memory().unwrap();

        let draft = SnippetDraft::new("Qs", "fast sorting routine", "py", "def qs(xs): ...");
        store.save_snippet(&draft, &[]).unwrap();

        let results = store.search_snippets("sorting", "py").unwrap();
        assert_eq!(results.len(), 1);
        assert!(store.search_snippets("sorting", "js").unwrap().is_empty());
    }

    #[test]
    fn test_search_is_ascii_case_insensitive() {
        let mut store = SnippetStore::open_in_memory().unwrap();

        store.save_snippet(&sample_draft("Quick Sort", "py"), &[]).unwrap();

        assert_eq!(store.search_snippets("sort", "py").unwrap().len(), 1);
        assert_eq!(store.search_snippets("SORT", "py").unwrap().len(), 1);
    }

    #[test]
    fn test_search_empty_query_matches_language() {
        let mut store = SnippetStore::open_in_memory().unwrap();

        store.save_snippet(&sample_draft("A", "py"), &[]).unwrap();
        store.save_snippet(&sample_draft("B", "py"), &[]).unwrap();
        store.save_snippet(&sample_draft("C", "js"), &[]).unwrap();

        assert_eq!(store.search_snippets("", "py").unwrap().len(), 2);
    }

    #[test]
    fn test_untagged_snippets() {
        let mut store = SnippetStore::open_in_memory().unwrap();

        let tag = store.insert_tag("tagged").unwrap();
        store.save_snippet(&sample_draft("With Tag", "rs"), &[tag]).unwrap();
        let loose_b = store.save_snippet(&sample_draft("Loose B", "rs"), &[]).unwrap();
        let loose_a = store.save_snippet(&sample_draft("Loose A", "rs"), &[]).unwrap();

        let untagged = store.untagged_snippets().unwrap();
        let ids: Vec<_> = untagged.iter().map(|s| s.id).collect();
        // Sorted by name, independent of insertion order.
        assert_eq!(ids, vec![loose_a, loose_b]);
    }

    #[test]
    fn test_list_tags_sorted_by_name() {
        let store = SnippetStore::open_in_memory().unwrap();

        store.insert_tag("zsh").unwrap();
        store.insert_tag("algorithms").unwrap();
        store.insert_tag("macros").unwrap();

        let names: Vec<_> = store
            .list_tags()
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["algorithms", "macros", "zsh"]);
    }

    #[test]
    fn test_duplicate_tag_name_rejected() {
        let store = SnippetStore::open_in_memory().unwrap();

        store.insert_tag("sorting").unwrap();
        let err = store.insert_tag("sorting").unwrap_err();
        assert!(matches!(err, Error::Write(_)));
        assert_eq!(store.count_tags().unwrap(), 1);
    }

    #[test]
    fn test_empty_tag_name_rejected() {
        let store = SnippetStore::open_in_memory().unwrap();
        assert!(matches!(store.insert_tag(" "), Err(Error::Validation(_))));
    }

    #[test]
    fn test_open_inaccessible_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no-such-dir").join("snipboard.db");
        let err = SnippetStore::open(&missing).unwrap_err();
        assert!(matches!(err, Error::StorageUnavailable(_)));
    }

    #[test]
    fn test_reopen_preserves_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snipboard.db");

        let mut store = SnippetStore::open(&path).unwrap();
        let tag = store.insert_tag("sorting").unwrap();
        let id = store
            .save_snippet(&sample_draft("Quick Sort", "py"), &[tag])
            .unwrap();
        store.close();

        let store = SnippetStore::open(&path).unwrap();
        let snippet = store.get_snippet_by_id(id).unwrap().unwrap();
        assert_eq!(snippet.name, "Quick Sort");
        assert_eq!(store.tags_for_snippet(id).unwrap().len(), 1);
    }
}
