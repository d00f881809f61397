use core::fmt;

use reqwest::StatusCode;
use serde::Deserialize;

/// Error body returned by PostgREST on a failed request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiError {
    pub code: Option<String>,
    pub message: String,
    pub details: Option<String>,
    pub hint: Option<String>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(code) = &self.code {
            write!(f, "[{}] ", code)?;
        }
        write!(f, "{}", self.message)?;
        if let Some(details) = &self.details {
            write!(f, " ({})", details)?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " hint: {}", hint)?;
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RestClientError {
    #[error("Http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Api error: {0} - {1}")]
    Api(StatusCode, ApiError),

    #[error("Failed to decode rows: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid service url: {0}")]
    InvalidUrl(String),

    #[error("Invalid content-range header: {0}")]
    InvalidContentRange(String),
}
