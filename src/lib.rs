// Fredo - personal code snippet manager
//!
//! Snippets live in SQLite, are ranked by a fuzzy scoring function over name,
//! tags and content, and can be executed through the matching interpreter.

pub mod cli;
pub mod config;
pub mod database;
pub mod editor;
pub mod models;
pub mod runner;
pub mod search;


// Re-export common types
pub use config::{ConfigManager, FredoConfig};
pub use database::{SnippetDatabase, SnippetFilter};
pub use models::{ExecutionMode, NewSnippet, Snippet};
pub use search::{ScoreResult, SearchEngine, SearchError, SearchRequest};
