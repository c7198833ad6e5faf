//! The read contract the search engine needs from snippet storage.

use anyhow::Result;

use crate::database::{SnippetDatabase, SnippetFilter};
use crate::models::Snippet;

/// Filtered snippet retrieval.
///
/// `language` matches exactly. `tags` is an OR filter: a snippet qualifies if
/// it carries ANY of the tags; `None` or an empty slice means no tag filter.
/// No matches is an empty vector, never an error.
pub trait SnippetStore {
    fn find_all(&self, language: Option<&str>, tags: Option<&[String]>) -> Result<Vec<Snippet>>;
}

impl SnippetStore for SnippetDatabase {
    fn find_all(&self, language: Option<&str>, tags: Option<&[String]>) -> Result<Vec<Snippet>> {
        let filter = SnippetFilter {
            text: None,
            language: language.map(str::to_string),
            tags: tags.map(<[String]>::to_vec),
        };
        self.find(&filter)
    }
}

/// A plain slice acts as an in-memory store, keeping slice order
impl SnippetStore for [Snippet] {
    fn find_all(&self, language: Option<&str>, tags: Option<&[String]>) -> Result<Vec<Snippet>> {
        let tags = tags.filter(|t| !t.is_empty());
        Ok(self
            .iter()
            .filter(|s| language.is_none_or(|lang| s.language == lang))
            .filter(|s| tags.is_none_or(|wanted| wanted.iter().any(|t| s.has_tag(t))))
            .cloned()
            .collect())
    }
}
