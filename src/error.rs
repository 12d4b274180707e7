//! Error types for Twitter API access.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TwitterError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Signature generation failed
    #[error("OAuth error: {0}")]
    OAuth(String),

    /// Twitter answered with a non-success status
    #[error("Twitter API error {status}: {message}")]
    Api { status: u16, message: String },

    /// The filtered stream could not be opened
    #[error("Stream error: {0}")]
    Stream(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl TwitterError {
    /// Credentials were rejected by the service.
    #[must_use]
    pub const fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Api { status: 401, .. })
    }

    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type TwitterResult<T> = Result<T, TwitterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_failure_only_for_401() {
        let unauthorized = TwitterError::Api {
            status: 401,
            message: "Could not authenticate you.".into(),
        };
        assert!(unauthorized.is_auth_failure());
        assert_eq!(unauthorized.status(), Some(401));

        let not_found = TwitterError::Api {
            status: 404,
            message: "Sorry, that page does not exist.".into(),
        };
        assert!(!not_found.is_auth_failure());
        assert_eq!(TwitterError::Stream("eof".into()).status(), None);
    }

    #[test]
    fn test_api_error_display() {
        let err = TwitterError::Api {
            status: 429,
            message: "Rate limit exceeded".into(),
        };
        assert_eq!(err.to_string(), "Twitter API error 429: Rate limit exceeded");
    }
}
