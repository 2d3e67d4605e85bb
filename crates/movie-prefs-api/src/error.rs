use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Backend did not return a CSRF token")]
    MissingToken,

    #[error("Invalid URL '{0}'")]
    InvalidUrl(String),
}

impl ApiError {
    /// True for non-2xx responses as opposed to transport or decode failures
    pub fn is_status(&self) -> bool {
        matches!(self, ApiError::Status { .. })
    }
}
