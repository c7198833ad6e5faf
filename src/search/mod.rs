// Fredo's Search Module - fuzzy ranking over stored snippets
//
// The store narrows candidates by language/tags, `scoring` rates each one
// against the query, and the engine sorts and truncates.

pub mod engine;
pub mod error;
pub mod fuzzy;
pub mod scoring;
pub mod store;

pub use engine::{ScoreResult, SearchEngine, SearchRequest};
pub use error::SearchError;
pub use scoring::score_snippet;
pub use store::SnippetStore;
