/// Errors surfaced by index construction and neighbor queries.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RecommendError {
    #[error("unknown title: {0}")]
    UnknownTitle(String),

    #[error("malformed configuration: {0}")]
    MalformedConfiguration(String),
}

pub type RecommendResult<T> = Result<T, RecommendError>;
