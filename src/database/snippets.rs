// Snippet CRUD and filtered queries

use super::helpers::{to_micros, SNIPPET_COLUMNS};
use super::*;
use anyhow::{bail, Result};
use rusqlite::{params, params_from_iter, ErrorCode, OptionalExtension};
use tracing::debug;

use crate::models::{normalize_language, normalize_tags, validate_name};

/// True when an insert/update tripped the UNIQUE(name) constraint
fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

/// Unicode-aware case-insensitive substring test. SQLite's LIKE only folds ASCII.
fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Rows always hold a valid name, non-empty content and normalized metadata,
/// whether or not the snippet came through `NewSnippet`
fn check_storable(snippet: &Snippet) -> Result<()> {
    validate_name(&snippet.name)?;
    if snippet.content.is_empty() {
        bail!("Snippet content must not be empty");
    }
    Ok(())
}

impl SnippetDatabase {
    /// Insert a new snippet. Fails if the name is already taken.
    ///
    /// Tags and language are stored normalized.
    pub fn create(&self, snippet: &Snippet) -> Result<()> {
        check_storable(snippet)?;
        let language = normalize_language(Some(&snippet.language));
        let tags_json = serde_json::to_string(&normalize_tags(&snippet.tags))?;

        let result = self.conn.execute(
            "INSERT INTO snippets
             (id, name, content, language, tags, execution_mode, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                snippet.id,
                snippet.name,
                snippet.content,
                language,
                tags_json,
                snippet.execution_mode.as_str(),
                to_micros(&snippet.created_at),
                to_micros(&snippet.updated_at),
            ],
        );

        match result {
            Ok(_) => {
                debug!("Created snippet '{}' ({})", snippet.name, snippet.id);
                Ok(())
            }
            Err(e) if is_constraint_violation(&e) => {
                bail!("Snippet '{}' already exists", snippet.name)
            }
            Err(e) => Err(anyhow!("Database error: {}", e)),
        }
    }

    pub fn get_by_id(&self, id: &str) -> Result<Option<Snippet>> {
        let query = format!("SELECT {} FROM snippets WHERE id = ?1", SNIPPET_COLUMNS);
        let snippet = self
            .conn
            .query_row(&query, params![id], Self::row_to_snippet)
            .optional()?;
        Ok(snippet)
    }

    pub fn get_by_name(&self, name: &str) -> Result<Option<Snippet>> {
        let query = format!("SELECT {} FROM snippets WHERE name = ?1", SNIPPET_COLUMNS);
        let snippet = self
            .conn
            .query_row(&query, params![name], Self::row_to_snippet)
            .optional()?;
        Ok(snippet)
    }

    /// Persist every mutable field of `snippet` and bump its `updated_at`.
    ///
    /// `updated_at` never moves backwards, even if the clock does. Renaming onto
    /// an existing name fails like `create` does.
    pub fn update(&self, snippet: &mut Snippet) -> Result<()> {
        check_storable(snippet)?;
        snippet.language = normalize_language(Some(&snippet.language));
        snippet.tags = normalize_tags(&snippet.tags);
        snippet.updated_at = snippet.updated_at.max(chrono::Utc::now());

        let tags_json = serde_json::to_string(&snippet.tags)?;
        let result = self.conn.execute(
            "UPDATE snippets
             SET name = ?1, content = ?2, language = ?3, tags = ?4,
                 execution_mode = ?5, updated_at = ?6
             WHERE id = ?7",
            params![
                snippet.name,
                snippet.content,
                snippet.language,
                tags_json,
                snippet.execution_mode.as_str(),
                to_micros(&snippet.updated_at),
                snippet.id,
            ],
        );

        match result {
            Ok(0) => bail!("Snippet '{}' not found", snippet.id),
            Ok(_) => {
                debug!("Updated snippet '{}' ({})", snippet.name, snippet.id);
                Ok(())
            }
            Err(e) if is_constraint_violation(&e) => {
                bail!("Snippet '{}' already exists", snippet.name)
            }
            Err(e) => Err(anyhow!("Database error: {}", e)),
        }
    }

    /// Delete by id. Returns whether a row was removed.
    pub fn delete(&self, id: &str) -> Result<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM snippets WHERE id = ?1", params![id])?;
        Ok(removed > 0)
    }

    /// Delete by name. Returns whether a row was removed.
    pub fn delete_by_name(&self, name: &str) -> Result<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM snippets WHERE name = ?1", params![name])?;
        debug!("delete_by_name('{}') removed {} row(s)", name, removed);
        Ok(removed > 0)
    }

    /// Every snippet, most recently updated first
    pub fn list_all(&self) -> Result<Vec<Snippet>> {
        self.find(&SnippetFilter::default())
    }

    /// Snippets matching `filter`, most recently updated first
    pub fn find(&self, filter: &SnippetFilter) -> Result<Vec<Snippet>> {
        let mut conditions: Vec<String> = Vec::new();
        let mut values: Vec<String> = Vec::new();

        if let Some(language) = &filter.language {
            conditions.push("language = ?".to_string());
            values.push(language.clone());
        }

        if let Some(tags) = filter.tags.as_ref().filter(|t| !t.is_empty()) {
            // ANY tag qualifies
            let placeholders = vec!["?"; tags.len()].join(", ");
            conditions.push(format!(
                "EXISTS (SELECT 1 FROM json_each(snippets.tags) WHERE json_each.value IN ({}))",
                placeholders
            ));
            values.extend(tags.iter().cloned());
        }

        let where_clause = if conditions.is_empty() {
            "1=1".to_string()
        } else {
            conditions.join(" AND ")
        };

        let query = format!(
            "SELECT {} FROM snippets WHERE {} ORDER BY updated_at DESC, rowid DESC",
            SNIPPET_COLUMNS, where_clause
        );

        let mut stmt = self.conn.prepare(&query)?;
        let mut snippets = stmt
            .query_map(params_from_iter(values.iter()), Self::row_to_snippet)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        // Text matching happens here rather than in SQL
        if let Some(text) = filter.text.as_deref().filter(|t| !t.is_empty()) {
            let needle = text.to_lowercase();
            snippets.retain(|s| {
                contains_folded(&s.name, &needle) || contains_folded(&s.content, &needle)
            });
        }

        debug!("find({:?}) returned {} snippet(s)", filter, snippets.len());
        Ok(snippets)
    }
}
