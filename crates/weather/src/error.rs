use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unsupported units \"{0}\" (use imperial, metric, or standard)")]
    Units(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("weather API error HTTP {status}: {body}")]
    Api { status: u16, body: String },
}

pub type Result<T> = std::result::Result<T, Error>;
