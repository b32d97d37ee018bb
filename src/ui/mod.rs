//! Terminal output helpers for the CLI
//!
//! Colors degrade to plain text when stdout is not a terminal.

pub mod table;

use owo_colors::{OwoColorize, Style};
use std::sync::OnceLock;

static THEME: OnceLock<Theme> = OnceLock::new();

#[derive(Debug, Clone)]
pub struct Theme {
    pub header: Style,
    pub success: Style,
    pub error: Style,
    pub warn: Style,
    pub dim: Style,
}

impl Theme {
    pub fn detect() -> Self {
        if !console::Term::stdout().is_term() {
            return Self::plain();
        }
        Self::colored()
    }

    pub fn colored() -> Self {
        Self {
            header: Style::new().cyan().bold(),
            success: Style::new().green().bold(),
            error: Style::new().red().bold(),
            warn: Style::new().yellow().bold(),
            dim: Style::new().white().dimmed(),
        }
    }

    pub fn plain() -> Self {
        Self {
            header: Style::new(),
            success: Style::new(),
            error: Style::new(),
            warn: Style::new(),
            dim: Style::new(),
        }
    }
}

pub fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::detect)
}

pub struct Icons;

impl Icons {
    pub const SEARCH: &str = "🔍";
    pub const CHECK: &str = "✅";
    pub const TAG: &str = "🏷️";
    pub const FILE: &str = "📄";
    pub const CLIPBOARD: &str = "📋";
    pub const STATS: &str = "📊";
    pub const DATABASE: &str = "🗄️";
    pub const EMPTY: &str = "∅";
}

pub fn success(label: &str) {
    println!("{} {}", Icons::CHECK, label.style(theme().success.clone()));
}

pub fn section(title: &str) {
    println!();
    println!("{}", title.style(theme().header.clone()));
}

pub fn empty(label: &str) {
    println!("{} {}", Icons::EMPTY, label.style(theme().dim.clone()));
}

pub fn dim(text: &str) -> String {
    text.style(theme().dim.clone()).to_string()
}
