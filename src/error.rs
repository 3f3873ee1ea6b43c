use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("User not authenticated: {0}")]
    Unauthenticated(String),

    #[error("Request failed with status {status}")]
    Http { status: u16, body: String },

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status of the failed response, when one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::Http { status, .. } => Some(*status),
            AppError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Response body text of the failed response, when one was received.
    pub fn body(&self) -> Option<&str> {
        match self {
            AppError::Http { body, .. } => Some(body.as_str()),
            _ => None,
        }
    }

    /// The `error` field of a JSON error body sent by the backend.
    pub fn backend_message(&self) -> Option<String> {
        let body = self.body()?;
        let value: serde_json::Value = serde_json::from_str(body).ok()?;
        value
            .get("error")
            .and_then(|e| e.as_str())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }
}

pub type AppResult<T> = Result<T, AppError>;
