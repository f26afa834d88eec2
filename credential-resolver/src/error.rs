//! Error types for credential resolution

/// Coarse classification of a [`ResolverError`], for hosts that only need to
/// branch on the failing stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    InvalidRequest,
    Transport,
    Fetch,
    Parse,
    NoData,
    Validation,
}

/// Custom error type for credential resolution.
///
/// Every stage of a resolve call fails with its own variant so callers can
/// discriminate on the failure without inspecting message text.
#[derive(thiserror::Error, Debug)]
pub enum ResolverError {
    /// Required configuration is missing or malformed
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// The resolve request itself is unusable
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    /// The store could not be reached (connection, DNS, TLS)
    #[error("Transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The store answered with a non-2xx status
    #[error("HTTP {status}: {message}")]
    Fetch { status: u16, message: String },

    /// The response body was not the JSON document we expected
    #[error("Failed to parse Vault response: {0}")]
    Parse(#[source] serde_json::Error),

    /// The secret envelope has no `data` object
    #[error("No data found in Vault secret")]
    NoData,

    /// The extracted mapping does not satisfy the requested credential type
    #[error("{message}")]
    Validation { message: String },
}

impl ResolverError {
    pub fn configuration(message: impl Into<String>) -> Self {
        ResolverError::Configuration {
            message: message.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        ResolverError::InvalidRequest {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ResolverError::Validation {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            ResolverError::Configuration { .. } => ErrorKind::Configuration,
            ResolverError::InvalidRequest { .. } => ErrorKind::InvalidRequest,
            ResolverError::Transport(_) => ErrorKind::Transport,
            ResolverError::Fetch { .. } => ErrorKind::Fetch,
            ResolverError::Parse(_) => ErrorKind::Parse,
            ResolverError::NoData => ErrorKind::NoData,
            ResolverError::Validation { .. } => ErrorKind::Validation,
        }
    }

    /// HTTP status reported by the store, for [`ResolverError::Fetch`] only
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            ResolverError::Fetch { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias for resolver operations
pub type Result<T> = std::result::Result<T, ResolverError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_display_includes_status() {
        let error = ResolverError::Fetch {
            status: 404,
            message: "Failed to query Vault URL: http://localhost/v1/x.".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "HTTP 404: Failed to query Vault URL: http://localhost/v1/x."
        );
        assert_eq!(error.status(), Some(404));
        assert_eq!(error.kind(), ErrorKind::Fetch);
    }

    #[test]
    fn test_no_data_message() {
        let error = ResolverError::NoData;
        assert_eq!(error.to_string(), "No data found in Vault secret");
        assert_eq!(error.status(), None);
    }

    #[test]
    fn test_parse_error_keeps_source() {
        let json_error = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let error = ResolverError::Parse(json_error);
        assert_eq!(error.kind(), ErrorKind::Parse);
        assert!(std::error::Error::source(&error).is_some());
        assert!(error.to_string().starts_with("Failed to parse Vault response"));
    }

    #[test]
    fn test_validation_message_is_verbatim() {
        let error = ResolverError::validation("No fields to extract from Vault secret");
        assert_eq!(error.to_string(), "No fields to extract from Vault secret");
        assert_eq!(error.kind(), ErrorKind::Validation);
    }
}
