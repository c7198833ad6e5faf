// Helper functions and utilities

use super::*;
use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::types::Type;

/// Standard SELECT column list for Snippet queries
/// Must stay in sync with row_to_snippet()
pub(crate) const SNIPPET_COLUMNS: &str =
    "id, name, content, language, tags, execution_mode, created_at, updated_at";

/// Timestamps are stored as integer microseconds
pub(crate) fn to_micros(timestamp: &DateTime<Utc>) -> i64 {
    timestamp.timestamp_micros()
}

fn conversion_error(
    column: usize,
    kind: Type,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, kind, Box::new(err))
}

#[derive(Debug, thiserror::Error)]
#[error("timestamp out of range: {0}")]
struct TimestampRangeError(i64);

fn from_micros(column: usize, micros: i64) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::from_timestamp_micros(micros)
        .ok_or_else(|| conversion_error(column, Type::Integer, TimestampRangeError(micros)))
}

impl SnippetDatabase {
    /// Get database statistics
    pub fn get_stats(&self) -> Result<DatabaseStats> {
        let total_snippets: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM snippets", [], |row| row.get(0))?;

        let total_tags: i64 = self.conn.query_row(
            "SELECT COUNT(DISTINCT json_each.value) FROM snippets, json_each(snippets.tags)",
            [],
            |row| row.get(0),
        )?;

        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT language FROM snippets ORDER BY language")?;
        let languages = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let db_size_mb = if let Ok(metadata) = std::fs::metadata(&self.file_path) {
            metadata.len() as f64 / (1024.0 * 1024.0)
        } else {
            0.0
        };

        Ok(DatabaseStats {
            total_snippets,
            total_tags,
            languages,
            db_size_mb,
        })
    }

    /// Helper to convert database row to Snippet
    pub(crate) fn row_to_snippet(row: &Row) -> rusqlite::Result<Snippet> {
        let tags_json: String = row.get("tags")?;
        let tags: Vec<String> =
            serde_json::from_str(&tags_json).map_err(|e| conversion_error(4, Type::Text, e))?;

        let mode_str: String = row.get("execution_mode")?;
        let execution_mode = mode_str
            .parse()
            .map_err(|e| conversion_error(5, Type::Text, e))?;

        Ok(Snippet {
            id: row.get("id")?,
            name: row.get("name")?,
            content: row.get("content")?,
            language: row.get("language")?,
            tags,
            execution_mode,
            created_at: from_micros(6, row.get("created_at")?)?,
            updated_at: from_micros(7, row.get("updated_at")?)?,
        })
    }
}
