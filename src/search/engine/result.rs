use serde::Serialize;

use crate::models::Snippet;

/// One ranked snippet. Built per search call, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    pub snippet: Snippet,
    pub score: u8,
}

impl ScoreResult {
    pub fn new(snippet: Snippet, score: u8) -> Self {
        Self { snippet, score }
    }
}
