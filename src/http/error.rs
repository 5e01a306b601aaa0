//! Error types for the query API

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HttpError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl HttpError {
    /// Status code reported to the client for this error
    pub fn status(&self) -> u16 {
        match self {
            HttpError::MalformedRequest(_) => 400,
            HttpError::Io(_) | HttpError::Json(_) => 500,
        }
    }
}
