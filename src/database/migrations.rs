// Schema migration system for database versioning

use super::*;
use anyhow::{anyhow, Result};
use rusqlite::params;
use tracing::{debug, info};

/// Current schema version - increment when adding migrations
pub const LATEST_SCHEMA_VERSION: i32 = 1;

impl SnippetDatabase {
    /// Run all pending schema migrations
    pub(super) fn run_migrations(&mut self) -> Result<()> {
        self.create_schema_version_table()?;

        let current_version = self.get_schema_version()?;
        let target_version = LATEST_SCHEMA_VERSION;

        if current_version >= target_version {
            debug!(
                "Database schema is up-to-date at version {}",
                current_version
            );
            return Ok(());
        }

        info!(
            "Running schema migrations: version {} -> {}",
            current_version, target_version
        );

        for version in (current_version + 1)..=target_version {
            info!("Applying migration to version {}", version);
            self.apply_migration(version)?;
            self.record_migration(version)?;
            info!("Migration to version {} completed", version);
        }

        Ok(())
    }

    fn create_schema_version_table(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY,
                applied_at INTEGER NOT NULL,
                description TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    /// Get the current schema version (0 for a fresh database)
    pub fn get_schema_version(&self) -> Result<i32> {
        let version: i32 = self.conn.query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |row| row.get(0),
        )?;
        Ok(version)
    }

    fn apply_migration(&mut self, version: i32) -> Result<()> {
        match version {
            1 => self.initialize_schema()?,
            _ => return Err(anyhow!("Unknown migration version: {}", version)),
        }
        Ok(())
    }

    fn record_migration(&self, version: i32) -> Result<()> {
        let description = match version {
            1 => "Initial schema",
            _ => "Unknown migration",
        };

        self.conn.execute(
            "INSERT OR REPLACE INTO schema_version (version, applied_at, description)
             VALUES (?, ?, ?)",
            params![version, chrono::Utc::now().timestamp(), description],
        )?;

        Ok(())
    }
}
