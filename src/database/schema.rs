// Database schema initialization and table creation

use super::*;
use anyhow::Result;
use tracing::debug;

impl SnippetDatabase {
    /// Create every table and index; safe to re-run
    pub(super) fn initialize_schema(&mut self) -> Result<()> {
        debug!("Creating database schema");

        self.create_snippets_table()?;

        debug!("Database schema created successfully");
        Ok(())
    }

    /// Create the snippets table and its lookup indexes
    fn create_snippets_table(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS snippets (
                id TEXT PRIMARY KEY,
                name TEXT UNIQUE NOT NULL,
                content TEXT NOT NULL,
                language TEXT NOT NULL DEFAULT 'auto',
                tags TEXT NOT NULL DEFAULT '[]',  -- JSON array of normalized tags
                execution_mode TEXT NOT NULL DEFAULT 'current'
                    CHECK(execution_mode IN ('current', 'isolated')),
                created_at INTEGER NOT NULL,  -- microseconds since epoch, UTC
                updated_at INTEGER NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_snippets_name ON snippets(name)",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_snippets_language ON snippets(language)",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_snippets_updated ON snippets(updated_at)",
            [],
        )?;

        debug!("Created snippets table and indexes");
        Ok(())
    }
}
