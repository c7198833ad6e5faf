//! Relevance scoring for a single snippet against a query.
//!
//! Policy, first match wins:
//! 1. query equals the name (case-insensitive) -> 100
//! 2. query is a substring of the name -> 95
//! 3. otherwise the best of three signals (name fuzzy, tags, content), with a
//!    10% boost when more than one signal fired.
//!
//! A score of 0 means "no match"; the engine drops those candidates.

use super::fuzzy::{partial_ratio, ratio};
use crate::models::Snippet;

pub const MAX_SCORE: u8 = 100;
pub const EXACT_NAME_SCORE: u8 = 100;
pub const NAME_SUBSTRING_SCORE: u8 = 95;

/// Added per tag containing the query
const TAG_SUBSTRING_SCORE: u32 = 70;
/// Added per tag fuzzily similar to the query
const TAG_FUZZY_SCORE: u32 = 50;
const TAG_FUZZY_THRESHOLD: u8 = 80;

const CONTENT_BASE_SCORE: u32 = 20;
const CONTENT_PER_OCCURRENCE: u32 = 5;
const CONTENT_MAX_SCORE: u32 = 50;
/// Fuzzy content matching only looks at this many leading characters
const CONTENT_PREVIEW_CHARS: usize = 500;

/// Raw name ratio above which the name counts as a matching signal
const NAME_SIGNAL_THRESHOLD: u8 = 60;

/// Score `snippet` for `query`. Case-insensitive; the query is not trimmed here.
pub fn score_snippet(query: &str, snippet: &Snippet) -> u8 {
    let query = query.to_lowercase();
    let name = snippet.name.to_lowercase();

    if query == name {
        return EXACT_NAME_SCORE;
    }
    if name.contains(&query) {
        return NAME_SUBSTRING_SCORE;
    }

    let name_ratio = ratio(&query, &name);
    let name_score = name_fuzzy_score(name_ratio);
    let tag_score = tag_score(&query, &snippet.tags);
    let content_score = content_score(&query, &snippet.content);

    let mut total = name_score.max(tag_score).max(content_score);

    let signals = [
        name_ratio > NAME_SIGNAL_THRESHOLD,
        tag_score > 0,
        content_score > 0,
    ]
    .iter()
    .filter(|&&fired| fired)
    .count();

    if signals > 1 {
        // floor(total * 1.1)
        total = total.saturating_mul(11) / 10;
    }

    // Tag hits accumulate past 100
    total.min(MAX_SCORE as u32) as u8
}

/// Name similarity weighted to 90%, floored
fn name_fuzzy_score(name_ratio: u8) -> u32 {
    name_ratio as u32 * 9 / 10
}

/// Sum over tags; uncapped
pub(crate) fn tag_score<S: AsRef<str>>(query: &str, tags: &[S]) -> u32 {
    tags.iter()
        .map(|tag| {
            let tag = tag.as_ref().to_lowercase();
            if tag.contains(query) {
                TAG_SUBSTRING_SCORE
            } else if ratio(query, &tag) > TAG_FUZZY_THRESHOLD {
                TAG_FUZZY_SCORE
            } else {
                0
            }
        })
        .sum()
}

/// Occurrence-based when the query appears verbatim, else half the partial
/// ratio against the content preview
pub(crate) fn content_score(query: &str, content: &str) -> u32 {
    let content = content.to_lowercase();

    if content.contains(query) {
        let occurrences = content.matches(query).count() as u32;
        return CONTENT_BASE_SCORE
            .saturating_add(CONTENT_PER_OCCURRENCE.saturating_mul(occurrences))
            .min(CONTENT_MAX_SCORE);
    }

    let preview: String = content.chars().take(CONTENT_PREVIEW_CHARS).collect();
    partial_ratio(query, &preview) as u32 / 2
}
