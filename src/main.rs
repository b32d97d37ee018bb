//! Snipboard CLI - Command-line interface for the snippet store

use clap::{Parser, Subcommand};
use snipboard::query::QueryEngine;
use snipboard::snippet::SnippetDraft;
use snipboard::storage::SnippetStore;
use snipboard::ui::{self, Icons, table};
use snipboard::{config, Snippet};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "snipboard")]
#[command(version)]
#[command(about = "Personal code-snippet manager - save, tag, and search snippets")]
#[command(long_about = r#"
Snipboard keeps your code snippets in a tag-organized SQLite store:
  • Save snippets with name, description, and language
  • Organize them with a tag vocabulary
  • Search by substring, scoped to a language
  • Browse by tag, including the untagged bucket

Example usage:
  snipboard init
  snipboard tag add sorting
  snipboard save --name "Quick Sort" --language py --file qs.py --tag sorting
  snipboard search Sort --language py
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create snipboard.toml and the snippet database
    Init {
        /// Project root to initialize
        #[arg(short, long, default_value = ".")]
        path: PathBuf,

        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },

    /// Manage the tag vocabulary
    Tag {
        #[command(subcommand)]
        action: TagAction,
    },

    /// Save a new snippet from a file or stdin
    Save {
        /// Snippet name
        #[arg(short, long)]
        name: String,

        /// Free-form description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Language tag, e.g. "rs" or "py" (defaults to the file extension)
        #[arg(short, long)]
        language: Option<String>,

        /// File with the snippet contents (reads stdin when omitted)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Tag names to link (repeatable); must already be seeded
        #[arg(short, long = "tag")]
        tags: Vec<String>,

        /// Path to the database file
        #[arg(long)]
        database: Option<PathBuf>,
    },

    /// Search snippets by name/description substring within a language
    Search {
        /// Search query (empty matches every snippet of the language)
        query: String,

        /// Language to search in
        #[arg(short, long)]
        language: String,

        /// Output format (text, json)
        #[arg(long, default_value = "text")]
        format: String,

        /// Path to the database file
        #[arg(long)]
        database: Option<PathBuf>,
    },

    /// Show one snippet with metadata and contents
    Show {
        /// Snippet id
        id: i64,

        /// Path to the database file
        #[arg(long)]
        database: Option<PathBuf>,
    },

    /// Print a snippet's contents and count the copy
    Copy {
        /// Snippet id
        id: i64,

        /// Path to the database file
        #[arg(long)]
        database: Option<PathBuf>,
    },

    /// List every snippet with its tags
    List {
        /// Output format (text, json)
        #[arg(long, default_value = "text")]
        format: String,

        /// Path to the database file
        #[arg(long)]
        database: Option<PathBuf>,
    },

    /// Browse snippets grouped by tag, plus the untagged bucket
    Browse {
        /// Path to the database file
        #[arg(long)]
        database: Option<PathBuf>,
    },

    /// Show snippet/tag/link counts
    Stats {
        /// Path to the database file
        #[arg(long)]
        database: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum TagAction {
    /// Seed a new tag
    Add {
        /// Tag name (unique)
        name: String,

        /// Path to the database file
        #[arg(long)]
        database: Option<PathBuf>,
    },

    /// List all tags
    List {
        /// Path to the database file
        #[arg(long)]
        database: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Init { path, force } => {
            let config_path = path.join(config::default_config_path());
            let db_path = config::default_database_path_in(&path);

            let cfg = config::SnipboardConfig {
                database: Some(db_path.to_string_lossy().to_string()),
            };
            config::write_config(&config_path, &cfg, force)?;
            config::ensure_db_dir(&db_path)?;

            // Opening creates the schema.
            let store = SnippetStore::open(&db_path)?;
            store.close();

            config::ensure_gitignore(&path)?;

            ui::success(&format!("Initialized snipboard in {}", path.display()));
            println!("{} Config: {}", Icons::FILE, config_path.display());
            println!("{} Database: {}", Icons::DATABASE, db_path.display());
        }

        Commands::Tag { action } => match action {
            TagAction::Add { name, database } => {
                let store = open_store(database)?;
                let id = store.insert_tag(&name)?;
                ui::success(&format!("Added tag '{}' (id {})", name, id));
                store.close();
            }
            TagAction::List { database } => {
                let store = open_store(database)?;
                let tags = store.list_tags()?;
                if tags.is_empty() {
                    ui::empty("No tags yet. Seed one with `snipboard tag add <name>`.");
                } else {
                    for tag in &tags {
                        println!("{} {} {}", Icons::TAG, tag.name, ui::dim(&format!("(id {})", tag.id)));
                    }
                }
                store.close();
            }
        },

        Commands::Save { name, description, language, file, tags, database } => {
            let (contents, language) = read_contents(file.as_deref(), language)?;
            let mut store = open_store(database)?;

            let tag_ids = resolve_tag_names(&store, &tags)?;
            let draft = SnippetDraft::new(&name, &description, &language, &contents);
            let id = store.save_snippet(&draft, &tag_ids)?;

            ui::success(&format!("Saved \"{}\" as snippet {}", name, id));
            if !tags.is_empty() {
                println!("{} Tags: {}", Icons::TAG, tags.join(", "));
            }
            store.close();
        }

        Commands::Search { query, language, format, database } => {
            let store = open_store(database)?;
            let results = store.search_snippets(&query, &language)?;

            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else {
                println!("{} Searching for '{}' in {} snippets...", Icons::SEARCH, query, language);
                if results.is_empty() {
                    ui::empty("No snippets found.");
                } else {
                    println!("{}", table::search_table(&results));
                }
            }
            store.close();
        }

        Commands::Show { id, database } => {
            let store = open_store(database)?;
            match store.get_snippet_by_id(id)? {
                Some(snippet) => print_snippet(&store, &snippet)?,
                None => ui::empty(&format!("No snippet with id {}.", id)),
            }
            store.close();
        }

        Commands::Copy { id, database } => {
            let store = open_store(database)?;
            match store.get_snippet_by_id(id)? {
                Some(snippet) => {
                    // Contents go to stdout untouched so they can be piped
                    // into a clipboard tool. Counting is best-effort and
                    // never fails the copy.
                    print!("{}", snippet.contents);
                    if let Err(e) = store.increment_times_copied(id) {
                        tracing::warn!("Failed to count copy for snippet {}: {}", id, e);
                    }
                }
                None => ui::empty(&format!("No snippet with id {}.", id)),
            }
            store.close();
        }

        Commands::List { format, database } => {
            let store = open_store(database)?;
            let engine = QueryEngine::new(&store);
            let entries = engine.snippets_with_tags()?;

            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else if entries.is_empty() {
                ui::empty("No snippets saved yet.");
            } else {
                println!("{}", table::snippet_table(&entries));
            }
            store.close();
        }

        Commands::Browse { database } => {
            let store = open_store(database)?;
            let engine = QueryEngine::new(&store);

            for tag in store.list_tags()? {
                ui::section(&format!("{} {}", Icons::TAG, tag.name));
                let snippets = engine.snippets_by_tag(tag.id)?;
                if snippets.is_empty() {
                    println!("  {}", ui::dim("(empty)"));
                }
                for snippet in snippets {
                    println!("  {} {} {}", Icons::FILE, snippet.name, ui::dim(&snippet.language));
                }
            }

            ui::section(&format!("{} untagged", Icons::CLIPBOARD));
            let untagged = engine.untagged_snippets()?;
            if untagged.is_empty() {
                println!("  {}", ui::dim("(empty)"));
            }
            for snippet in untagged {
                println!("  {} {} {}", Icons::FILE, snippet.name, ui::dim(&snippet.language));
            }
            store.close();
        }

        Commands::Stats { database } => {
            let store = open_store(database)?;
            let stats = store.stats()?;
            println!("{} Snipboard Statistics", Icons::STATS);
            println!("{}", table::stats_table(&stats));
            store.close();
        }
    }

    Ok(())
}

/// Resolve the database path: explicit flag, then snipboard.toml, then
/// the default location under the current directory.
fn resolve_database(flag: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(path);
    }
    if let Some(cfg) = config::load_config(None)? {
        if let Some(db) = cfg.database {
            return Ok(PathBuf::from(db));
        }
    }
    Ok(config::default_database_path_in(Path::new(".")))
}

fn open_store(flag: Option<PathBuf>) -> anyhow::Result<SnippetStore> {
    let db_path = resolve_database(flag)?;
    tracing::debug!("Opening snippet database at {}", db_path.display());
    Ok(SnippetStore::open(&db_path)?)
}

/// Read snippet contents from a file or stdin; derive the language from
/// the file extension when not given explicitly.
fn read_contents(file: Option<&Path>, language: Option<String>) -> anyhow::Result<(String, String)> {
    match file {
        Some(path) => {
            let contents = std::fs::read_to_string(path)?;
            let language = match language {
                Some(l) => l,
                None => path
                    .extension()
                    .and_then(|s| s.to_str())
                    .unwrap_or("txt")
                    .to_string(),
            };
            Ok((contents, language))
        }
        None => {
            let Some(language) = language else {
                anyhow::bail!("--language is required when reading from stdin");
            };
            let mut contents = String::new();
            std::io::stdin().read_to_string(&mut contents)?;
            Ok((contents, language))
        }
    }
}

/// Map tag names to ids against the seeded vocabulary.
fn resolve_tag_names(store: &SnippetStore, names: &[String]) -> anyhow::Result<Vec<i64>> {
    if names.is_empty() {
        return Ok(Vec::new());
    }
    let known = store.list_tags()?;
    let mut ids = Vec::with_capacity(names.len());
    for name in names {
        match known.iter().find(|t| t.name == *name) {
            Some(tag) => ids.push(tag.id),
            None => anyhow::bail!(
                "unknown tag '{}' (seed it first with `snipboard tag add {}`)",
                name,
                name
            ),
        }
    }
    Ok(ids)
}

fn print_snippet(store: &SnippetStore, snippet: &Snippet) -> anyhow::Result<()> {
    println!("{} {} {}", Icons::FILE, snippet.name, ui::dim(&format!("(id {})", snippet.id)));
    if !snippet.description.is_empty() {
        println!("  {}", snippet.description);
    }
    println!("  Language: {}", snippet.language);
    println!("  Copied: {} times", snippet.times_copied);

    let tags = store.tags_for_snippet(snippet.id)?;
    if !tags.is_empty() {
        let names: Vec<_> = tags.iter().map(|t| t.name.as_str()).collect();
        println!("  Tags: {}", names.join(", "));
    }

    ui::section("Contents");
    println!("{}", snippet.contents);
    Ok(())
}
