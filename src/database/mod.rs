//! Fredo's Database Module - SQLite snippet store
//!
//! One `snippets` table holds every snippet. Tags live in a JSON array column
//! and are filtered with `json_each`, so tag queries stay a single statement.

use anyhow::{anyhow, Context, Result};
use rusqlite::{Connection, Row};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::models::Snippet;

// Module declarations
mod helpers;
mod migrations;
mod schema;
mod snippets;
mod tags;
pub mod types;

// Re-export public types
pub use migrations::LATEST_SCHEMA_VERSION;
pub use types::*;

/// The main database connection and operations
pub struct SnippetDatabase {
    pub(crate) conn: Connection,
    pub(crate) file_path: PathBuf,
}

impl SnippetDatabase {
    /// Open (or create) a database file and bring its schema up to date
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let file_path = db_path.as_ref().to_path_buf();

        info!("Initializing SQLite database at: {}", file_path.display());

        if let Some(parent) = file_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create database directory {}", parent.display())
                })?;
            }
        }

        let conn =
            Connection::open(&file_path).map_err(|e| anyhow!("Failed to open database: {}", e))?;

        // Wait up to 5 seconds when another fredo process holds the lock
        conn.busy_timeout(std::time::Duration::from_millis(5000))?;

        Self::from_connection(conn, file_path)
    }

    /// Fresh private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| anyhow!("Failed to open in-memory database: {}", e))?;
        Self::from_connection(conn, PathBuf::from(":memory:"))
    }

    fn from_connection(conn: Connection, file_path: PathBuf) -> Result<Self> {
        let mut db = Self { conn, file_path };

        // Version 1 creates the schema
        db.run_migrations()?;

        info!("Database initialized successfully");
        Ok(db)
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }
}
