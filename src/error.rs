// Error types for the repodeck application.
// Covers GitHub API errors, token storage errors, and general application errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeckError {
    #[error("GitHub API error: {0}")]
    Api(#[from] reqwest::Error),

    #[error("Authentication failed: invalid or expired token")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("A repository with that name already exists on this account")]
    NameExists,

    #[error("Rate limit exceeded, resets at {reset_at}")]
    RateLimited { reset_at: String },

    #[error("No token stored, log in first")]
    MissingToken,

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl DeckError {
    /// Whether this error is an authentication/authorization failure (401/403).
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, DeckError::Unauthorized)
    }

    /// Whether a read that failed with this error may be retried.
    /// Auth failures are terminal; so are not-found, duplicate-name, and
    /// rate-limit responses. Server errors and network failures are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            DeckError::Api(_) => true,
            DeckError::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            DeckError::Unauthorized => Some(401),
            DeckError::NotFound(_) => Some(404),
            DeckError::NameExists => Some(422),
            DeckError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, DeckError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_failures_not_retryable() {
        assert!(DeckError::Unauthorized.is_auth_failure());
        assert!(!DeckError::Unauthorized.is_retryable());
    }

    #[test]
    fn test_server_errors_retryable() {
        let err = DeckError::Status {
            status: 500,
            message: "Internal Server Error".to_string(),
        };
        assert!(err.is_retryable());
        assert!(!err.is_auth_failure());

        let err = DeckError::Status {
            status: 503,
            message: "Service Unavailable".to_string(),
        };
        assert!(err.is_retryable());
    }

    #[test]
    fn test_client_errors_terminal() {
        let err = DeckError::Status {
            status: 422,
            message: "Validation Failed".to_string(),
        };
        assert!(!err.is_retryable());
        assert!(!DeckError::NameExists.is_retryable());
        assert!(!DeckError::NotFound("x".to_string()).is_retryable());
        assert!(
            !DeckError::RateLimited {
                reset_at: "12:00:00".to_string()
            }
            .is_retryable()
        );
    }

    #[test]
    fn test_name_exists_message_is_distinct() {
        let generic = DeckError::Status {
            status: 422,
            message: "Validation Failed".to_string(),
        };
        assert_ne!(DeckError::NameExists.to_string(), generic.to_string());
        assert!(DeckError::NameExists.to_string().contains("already exists"));
    }
}
