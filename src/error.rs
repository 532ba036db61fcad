//! Error types for the NPU chat gateway

use thiserror::Error;

use crate::backend::BackendError;

/// Result type alias for startup and server operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring or running the gateway
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// HTTP server error (bind, serve)
    #[error("server error: {0}")]
    Server(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Terminal outcome of a failed chat request
///
/// The `Display` text is the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// Another inference call holds the gate
    #[error("Sorry, I can only handle one request at a time and I'm currently busy.")]
    Busy,

    /// The backend did not answer within the configured bound
    #[error("The request timed out. Please try again later.")]
    Timeout,

    /// Connection failure or non-2xx status from the backend
    #[error("Error: {0}. The NPU server may be offline.")]
    BackendUnavailable(String),

    /// The backend answered without a reply field
    #[error("Error: {0}. The NPU server may be offline.")]
    MalformedBackendResponse(String),
}

impl From<BackendError> for GatewayError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Timeout => Self::Timeout,
            BackendError::Connection(_) | BackendError::Status { .. } => {
                Self::BackendUnavailable(err.to_string())
            }
            BackendError::Malformed(_) => Self::MalformedBackendResponse(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn busy_message_mentions_single_request() {
        assert!(GatewayError::Busy.to_string().contains("one request at a time"));
    }

    #[test]
    fn backend_errors_map_to_gateway_kinds() {
        assert_eq!(GatewayError::from(BackendError::Timeout), GatewayError::Timeout);
        assert!(matches!(
            GatewayError::from(BackendError::Status {
                status: 500,
                body: "boom".to_string()
            }),
            GatewayError::BackendUnavailable(_)
        ));
        assert!(matches!(
            GatewayError::from(BackendError::Malformed("missing content".to_string())),
            GatewayError::MalformedBackendResponse(_)
        ));
    }

    #[test]
    fn unavailable_and_malformed_read_the_same_to_users() {
        let unavailable = GatewayError::BackendUnavailable("x".to_string()).to_string();
        let malformed = GatewayError::MalformedBackendResponse("x".to_string()).to_string();
        assert_eq!(unavailable, malformed);
        assert!(unavailable.contains("may be offline"));
    }
}
