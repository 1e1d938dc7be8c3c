//! Error types for the AI helper.

use thiserror::Error;

/// Errors talking to the Anthropic Messages API.
#[derive(Debug, Error)]
pub enum ClaudeError {
    /// Client could not be built from the configured key.
    #[error("invalid client configuration: {0}")]
    Config(String),

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Claude API returned an error.
    #[error("API error ({error_type}): {message}")]
    Api { error_type: String, message: String },

    /// Rate limited by the API.
    #[error("rate limited, retry after {0} seconds")]
    RateLimited(u64),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Failed to parse response.
    #[error("parse error: {0}")]
    Parse(String),
}

/// Why a notification draft could not be produced.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// No API key is configured.
    #[error("AI drafting is not configured")]
    Disabled,

    /// A required input field is blank.
    #[error("missing input: {0}")]
    MissingInput(&'static str),

    #[error(transparent)]
    Claude(#[from] ClaudeError),

    /// The model answered, but not with a usable notification.
    #[error("invalid model output: {0}")]
    InvalidOutput(String),
}

impl GenerationError {
    /// Translation key of the message shown on the compose page.
    #[must_use]
    pub const fn message_key(&self) -> &'static str {
        match self {
            Self::MissingInput(_) => "notifications.ai.missingInput",
            Self::Disabled | Self::Claude(_) | Self::InvalidOutput(_) => {
                "notifications.ai.failed"
            }
        }
    }
}

/// API error response from Claude.
#[derive(Debug, serde::Deserialize)]
pub struct ApiErrorResponse {
    #[serde(rename = "type")]
    pub error_type: String,
    pub error: ApiError,
}

/// Nested error details.
#[derive(Debug, serde::Deserialize)]
pub struct ApiError {
    #[serde(rename = "type")]
    pub error_type: String,
    pub message: String,
}
