use crate::search::error::{Result, SearchError};

/// Arguments for [`SearchEngine::search`](super::SearchEngine::search)
///
/// `language` and `tags` go to the store verbatim. A `limit` of `None` is
/// unbounded; `Some(0)` yields nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: Option<String>,
    pub language: Option<String>,
    pub tags: Option<Vec<String>>,
    pub limit: Option<usize>,
}

impl SearchRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
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

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Limit from a signed source such as a command-line flag
    pub fn try_limit(self, limit: i64) -> Result<Self> {
        let limit = usize::try_from(limit).map_err(|_| SearchError::InvalidArgument {
            param: "limit",
            reason: format!("must be non-negative, got {}", limit),
        })?;
        Ok(self.limit(limit))
    }

    /// Trimmed, lower-cased query; `None` when absent or blank
    pub fn normalized_query(&self) -> Option<String> {
        self.query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase)
    }
}
