//! Database schema definitions

/// SQL to create the Tag table
pub const CREATE_TAG_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS Tag (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
)
"#;

/// SQL to create the Snippet table
///
/// `folder` and `favorite` are reserved columns: written with their
/// defaults on save, never set by any operation.
pub const CREATE_SNIPPET_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS Snippet (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    language TEXT NOT NULL DEFAULT '',
    contents TEXT NOT NULL,
    folder TEXT,
    favorite INTEGER NOT NULL DEFAULT 0,
    timesCopied INTEGER NOT NULL DEFAULT 0
)
"#;

/// SQL to create the SnippetTagLink junction table
///
/// Composite primary key; both columns are foreign keys, so a link can
/// never reference a missing snippet or tag while `PRAGMA foreign_keys`
/// is on.
pub const CREATE_SNIPPET_TAG_LINK_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS SnippetTagLink (
    snippetId INTEGER NOT NULL REFERENCES Snippet(id),
    tagId INTEGER NOT NULL REFERENCES Tag(id),
    PRIMARY KEY (snippetId, tagId)
)
"#;

/// SQL to create indexes
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_snippet_name ON Snippet(name)",
    "CREATE INDEX IF NOT EXISTS idx_snippet_language ON Snippet(language)",
    "CREATE INDEX IF NOT EXISTS idx_link_tag ON SnippetTagLink(tagId)",
];

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    let mut stmts = vec![
        CREATE_TAG_TABLE,
        CREATE_SNIPPET_TABLE,
        CREATE_SNIPPET_TAG_LINK_TABLE,
    ];
    stmts.extend(CREATE_INDEXES.iter().copied());
    stmts
}
