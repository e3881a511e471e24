use thiserror::Error;

/// Submitted search input was empty (or only whitespace). Nothing is pushed and
/// no request is issued.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("search term is empty")]
pub struct EmptyTermError;

/// A single search request against the backend failed.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("search request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("search backend returned HTTP {status}{}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    Status { status: u16, message: Option<String> },

    #[error("malformed search response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid search endpoint {0:?}")]
    InvalidEndpoint(String),
}

impl FetchError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Network(e) if e.is_timeout())
    }
}

pub type FetchResult<T> = std::result::Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display_includes_backend_message() {
        let err = FetchError::Status {
            status: 400,
            message: Some("Term is required".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "search backend returned HTTP 400: Term is required"
        );
    }

    #[test]
    fn test_status_display_without_message() {
        let err = FetchError::Status {
            status: 502,
            message: None,
        };
        assert_eq!(err.to_string(), "search backend returned HTTP 502");
    }

    #[test]
    fn test_decode_error_carries_cause() {
        let cause = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err = FetchError::from(cause);
        assert!(err.to_string().starts_with("malformed search response:"));
        assert!(!err.is_timeout());
    }
}
