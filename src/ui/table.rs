//! Table rendering for snippet listings and statistics

use crate::query::SnippetWithTags;
use crate::snippet::Snippet;
use crate::storage::DbStats;
use tabled::{Table, Tabled, settings::Style};

#[derive(Tabled)]
struct SnippetRow {
    #[tabled(rename = "Id")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Language")]
    language: String,
    #[tabled(rename = "Tags")]
    tags: String,
    #[tabled(rename = "Copied")]
    copied: i64,
}

/// Render snippets with their tags as a rounded table
pub fn snippet_table(entries: &[SnippetWithTags]) -> String {
    let rows: Vec<SnippetRow> = entries
        .iter()
        .map(|e| SnippetRow {
            id: e.snippet.id,
            name: e.snippet.name.clone(),
            language: e.snippet.language.clone(),
            tags: e
                .tags
                .iter()
                .map(|t| t.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            copied: e.snippet.times_copied,
        })
        .collect();

    if rows.is_empty() {
        return String::new();
    }
    Table::new(&rows).with(Style::rounded()).to_string()
}

/// Render search results (no tag column) as a rounded table
pub fn search_table(snippets: &[Snippet]) -> String {
    #[derive(Tabled)]
    struct ResultRow {
        #[tabled(rename = "Id")]
        id: i64,
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Description")]
        description: String,
        #[tabled(rename = "Copied")]
        copied: i64,
    }

    let rows: Vec<ResultRow> = snippets
        .iter()
        .map(|s| ResultRow {
            id: s.id,
            name: s.name.clone(),
            description: s.description.clone(),
            copied: s.times_copied,
        })
        .collect();

    if rows.is_empty() {
        return String::new();
    }
    Table::new(&rows).with(Style::rounded()).to_string()
}

/// Render database statistics as a two-column table
pub fn stats_table(stats: &DbStats) -> String {
    #[derive(Tabled)]
    struct StatRow {
        #[tabled(rename = "Metric")]
        metric: String,
        #[tabled(rename = "Value")]
        value: String,
    }

    let rows = vec![
        StatRow { metric: "Snippets".into(), value: stats.snippets.to_string() },
        StatRow { metric: "Tags".into(), value: stats.tags.to_string() },
        StatRow { metric: "Links".into(), value: stats.links.to_string() },
    ];
    Table::new(&rows).with(Style::rounded()).to_string()
}
