//! Snippet data model
//!
//! A snippet is a named, tagged piece of code with language and execution-mode
//! metadata. Snippets are built through [`NewSnippet`], which validates the
//! name/content constraints and normalizes tags before anything reaches the
//! database.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Maximum snippet name length, in characters
pub const MAX_NAME_LENGTH: usize = 255;

/// Language sentinel meaning "detect at run time"
pub const AUTO_LANGUAGE: &str = "auto";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid snippet name: {0}")]
    Name(String),

    #[error("Snippet content must not be empty")]
    EmptyContent,

    #[error("execution_mode must be 'current' or 'isolated', got '{0}'")]
    ExecutionMode(String),
}

/// Where a snippet runs: the caller's working directory or a throwaway one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    #[default]
    Current,
    Isolated,
}

impl ExecutionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionMode::Current => "current",
            ExecutionMode::Isolated => "isolated",
        }
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExecutionMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "current" => Ok(ExecutionMode::Current),
            "isolated" => Ok(ExecutionMode::Isolated),
            other => Err(ValidationError::ExecutionMode(other.to_string())),
        }
    }
}

/// A stored snippet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snippet {
    pub id: String,
    pub name: String,
    pub content: String,
    pub language: String,
    pub tags: Vec<String>,
    pub execution_mode: ExecutionMode,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Snippet {
    /// File extension used when this snippet is written to disk
    pub fn file_extension(&self) -> &'static str {
        file_extension_for_language(&self.language)
    }

    /// Add tags, keeping the set normalized. Returns how many were new.
    pub fn add_tags<S: AsRef<str>>(&mut self, tags: &[S]) -> usize {
        let before = self.tags.len();
        let mut merged = std::mem::take(&mut self.tags);
        merged.extend(tags.iter().map(|t| t.as_ref().to_string()));
        self.tags = normalize_tags(&merged);
        self.tags.len() - before
    }

    /// Remove tags (compared after normalization). Returns how many were removed.
    pub fn remove_tags<S: AsRef<str>>(&mut self, tags: &[S]) -> usize {
        let doomed = normalize_tags(tags);
        let before = self.tags.len();
        self.tags.retain(|t| !doomed.contains(t));
        before - self.tags.len()
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Builder for snippets that have not been stored yet
#[derive(Debug, Clone)]
pub struct NewSnippet {
    name: String,
    content: String,
    language: Option<String>,
    tags: Vec<String>,
    execution_mode: ExecutionMode,
}

impl NewSnippet {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            language: None,
            tags: Vec::new(),
            execution_mode: ExecutionMode::default(),
        }
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn tags<S: AsRef<str>>(mut self, tags: &[S]) -> Self {
        self.tags = tags.iter().map(|t| t.as_ref().to_string()).collect();
        self
    }

    pub fn execution_mode(mut self, mode: ExecutionMode) -> Self {
        self.execution_mode = mode;
        self
    }

    /// Validate and assign identity + timestamps
    pub fn build(self) -> Result<Snippet, ValidationError> {
        validate_name(&self.name)?;
        if self.content.is_empty() {
            return Err(ValidationError::EmptyContent);
        }

        let now = Utc::now();
        Ok(Snippet {
            id: Uuid::new_v4().to_string(),
            name: self.name,
            content: self.content,
            language: normalize_language(self.language.as_deref()),
            tags: normalize_tags(&self.tags),
            execution_mode: self.execution_mode,
            created_at: now,
            updated_at: now,
        })
    }
}

pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::Name("name must not be empty".to_string()));
    }
    let length = name.chars().count();
    if length > MAX_NAME_LENGTH {
        return Err(ValidationError::Name(format!(
            "name is {} characters, maximum is {}",
            length, MAX_NAME_LENGTH
        )));
    }
    Ok(())
}

/// Lower-case a language name; missing or blank means `auto`
pub fn normalize_language(language: Option<&str>) -> String {
    match language.map(str::trim) {
        Some(lang) if !lang.is_empty() => lang.to_lowercase(),
        _ => AUTO_LANGUAGE.to_string(),
    }
}

/// Trim, lower-case, drop empty entries and duplicates (first occurrence wins)
pub fn normalize_tags<S: AsRef<str>>(tags: &[S]) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.as_ref().trim().to_lowercase();
        if !tag.is_empty() && !normalized.contains(&tag) {
            normalized.push(tag);
        }
    }
    normalized
}

pub fn file_extension_for_language(language: &str) -> &'static str {
    match language.to_lowercase().as_str() {
        "python" => ".py",
        "bash" | "shell" => ".sh",
        "javascript" => ".js",
        "typescript" => ".ts",
        "ruby" => ".rb",
        "go" => ".go",
        "rust" => ".rs",
        "java" => ".java",
        "c" => ".c",
        "cpp" => ".cpp",
        "csharp" => ".cs",
        "php" => ".php",
        "sql" => ".sql",
        "html" => ".html",
        "css" => ".css",
        "json" => ".json",
        "yaml" => ".yaml",
        "markdown" => ".md",
        _ => ".txt",
    }
}
