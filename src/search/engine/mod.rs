mod queries;
mod request;
mod result;

pub use request::SearchRequest;
pub use result::ScoreResult;

use super::store::SnippetStore;

/// Candidate count at which scoring fans out across the rayon pool
pub(crate) const PARALLEL_SCORING_THRESHOLD: usize = 64;

/// Ranks snippets from a borrowed store against a free-text query
pub struct SearchEngine<'a, S: SnippetStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: SnippetStore + ?Sized> SearchEngine<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }
}
