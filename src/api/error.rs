use thiserror::Error;

/// Failures reported by the AetherOne gateway.
///
/// Callers translate these into UI state (offline flag, toast) at the
/// boundary nearest the call; they are never retried here.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The configured base URL could not be parsed or joined
    #[error("Invalid base URL '{url}': {message}")]
    InvalidBaseUrl { url: String, message: String },

    /// The HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// Network failure, timeout or refused connection
    #[error("Request to '{endpoint}' failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status
    #[error("Server returned {status} for '{endpoint}'")]
    Status { endpoint: String, status: u16 },

    /// The response body did not match the expected shape
    #[error("Failed to decode response from '{endpoint}': {message}")]
    Decode { endpoint: String, message: String },
}

impl ApiError {
    pub fn invalid_base_url(url: impl Into<String>, message: impl ToString) -> Self {
        Self::InvalidBaseUrl {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// True when the server could not be reached at all
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// HTTP status code, if the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
