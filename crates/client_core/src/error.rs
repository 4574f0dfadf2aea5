use thiserror::Error;

pub const GENERIC_API_ERROR: &str = "An unexpected error occurred.";
pub const GENERIC_FAILURE_MESSAGE: &str =
    "An unexpected error occurred while generating the story. Please try again.";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid story service url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("story service request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("story service returned HTTP {status}: {}", .detail.as_deref().unwrap_or("no detail"))]
    Api { status: u16, detail: Option<String> },
    #[error("malformed story response: {0}")]
    MalformedResponse(String),
}

impl ClientError {
    /// Message suitable for showing to the person who submitted the form.
    ///
    /// Errors the service answered with carry its `detail` text; transport
    /// failures and malformed bodies get a generic retry hint.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Api { detail, .. } => {
                format!("Error: {}", detail.as_deref().unwrap_or(GENERIC_API_ERROR))
            }
            ClientError::InvalidBaseUrl { .. }
            | ClientError::Transport(_)
            | ClientError::MalformedResponse(_) => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Transport(err) => err.status().map(|status| status.as_u16()),
            _ => None,
        }
    }
}
