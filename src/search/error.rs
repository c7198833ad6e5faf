use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    /// The caller broke the search contract (e.g. a negative limit)
    #[error("Invalid argument '{param}': {reason}")]
    InvalidArgument { param: &'static str, reason: String },

    /// Store failures pass through untouched
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, SearchError>;
