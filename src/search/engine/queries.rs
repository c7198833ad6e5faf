use super::result::ScoreResult;
use super::{SearchEngine, PARALLEL_SCORING_THRESHOLD};
use crate::models::Snippet;
use crate::search::error::Result;
use crate::search::scoring::{score_snippet, MAX_SCORE};
use crate::search::store::SnippetStore;
use crate::search::SearchRequest;
use rayon::prelude::*;
use tracing::{debug, info};

impl<S: SnippetStore + ?Sized> SearchEngine<'_, S> {
    /// Rank the store's snippets for `request`.
    ///
    /// Without a query every candidate comes back at score 100 in store order.
    /// With one, zero scores are dropped and the rest sorted by score
    /// descending; the sort is stable, so ties keep store order.
    pub fn search(&self, request: &SearchRequest) -> Result<Vec<ScoreResult>> {
        let start_time = std::time::Instant::now();

        let candidates = self
            .store
            .find_all(request.language.as_deref(), request.tags.as_deref())?;
        let candidate_count = candidates.len();

        let mut results = match request.normalized_query() {
            None => candidates
                .into_iter()
                .map(|snippet| ScoreResult::new(snippet, MAX_SCORE))
                .collect(),
            Some(query) => {
                let mut scored = score_candidates(&query, candidates);
                scored.sort_by(|a, b| b.score.cmp(&a.score));
                scored
            }
        };

        if let Some(limit) = request.limit {
            results.truncate(limit);
        }

        info!(
            "Search completed: query={:?}, candidates={}, results={}, time={:.2}ms",
            request.query,
            candidate_count,
            results.len(),
            start_time.elapsed().as_secs_f64() * 1000.0
        );
        if let Some(top) = results.first() {
            debug!("Top result: {} ({})", top.snippet.name, top.score);
        }

        Ok(results)
    }

    /// Shorthand for a query-only search with no filters or limit
    pub fn search_query(&self, query: &str) -> Result<Vec<ScoreResult>> {
        self.search(&SearchRequest::new().query(query))
    }
}

/// Score every candidate, dropping non-matches. Output keeps input order.
fn score_candidates(query: &str, candidates: Vec<Snippet>) -> Vec<ScoreResult> {
    let score_one = |snippet: Snippet| {
        let score = score_snippet(query, &snippet);
        (score > 0).then(|| ScoreResult::new(snippet, score))
    };

    if candidates.len() >= PARALLEL_SCORING_THRESHOLD {
        debug!("Scoring {} candidates in parallel", candidates.len());
        candidates.into_par_iter().filter_map(score_one).collect()
    } else {
        candidates.into_iter().filter_map(score_one).collect()
    }
}
