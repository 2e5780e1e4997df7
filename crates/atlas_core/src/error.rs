use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Schema violation: {0}")]
    SchemaViolation(String),

    #[error("Generation failed after {attempts} attempts")]
    GenerationFailure { attempts: u32, last_response: String },

    #[error("Input error: {0}")]
    InputError(String),

    #[error("Render error: {0}")]
    Render(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::BackendUnavailable(err.to_string())
    }
}

impl Error {
    /// Failures absorbed by the generation attempt loop. Everything else
    /// surfaces to the caller immediately.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::BackendUnavailable(_) | Error::MalformedResponse(_) | Error::SchemaViolation(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
