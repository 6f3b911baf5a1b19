use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("summarization call failed: {0}")]
    Summarize(#[source] anyhow::Error),

    #[error("summarization produced empty text")]
    EmptySummary,
}

pub type Result<T> = std::result::Result<T, Error>;
