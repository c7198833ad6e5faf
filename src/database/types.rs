// Database type definitions

use serde::Serialize;

/// Row filter for snippet queries. Every `None` field is unconstrained.
#[derive(Debug, Clone, Default)]
pub struct SnippetFilter {
    /// Case-insensitive substring of name or content
    pub text: Option<String>,
    /// Exact language match
    pub language: Option<String>,
    /// Snippet must carry at least one of these tags; empty means no filter
    pub tags: Option<Vec<String>>,
}

impl SnippetFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }
}

/// Tag usage count, as reported by `tag list`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub tag: String,
    pub count: i64,
}

/// Database statistics
#[derive(Debug, Default)]
pub struct DatabaseStats {
    pub total_snippets: i64,
    pub total_tags: i64,
    pub languages: Vec<String>,
    pub db_size_mb: f64,
}
