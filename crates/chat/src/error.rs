use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("completion failed: {0}")]
    Completion(#[source] anyhow::Error),

    #[error(transparent)]
    Weather(#[from] yumi_weather::Error),

    #[error("{message}")]
    Message { message: String },
}

impl Error {
    #[must_use]
    pub fn message(message: impl std::fmt::Display) -> Self {
        Self::Message {
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
