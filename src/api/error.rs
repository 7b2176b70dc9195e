use thiserror::Error;

/// Typed API errors enabling retry classification.
///
/// `is_retryable()` distinguishes transient failures (server errors, rate
/// limits, timeouts, connection resets) from permanent ones (client errors,
/// malformed payloads) so the retry loop can abort early.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("unsuccessful request: {status} - {reason}\n{body}")]
    Request {
        status: u16,
        reason: String,
        body: String,
    },

    #[error("request timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl ApiError {
    /// Whether this error is transient and worth retrying.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Request { status, .. } => *status == 429 || *status >= 500,
            ApiError::Timeout(_) => true,
            ApiError::Http(_) => true,
            ApiError::Json(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_error(status: u16) -> ApiError {
        ApiError::Request {
            status,
            reason: "reason".into(),
            body: "body".into(),
        }
    }

    #[test]
    fn test_http_404_not_retryable() {
        assert!(!request_error(404).is_retryable());
    }

    #[test]
    fn test_http_401_not_retryable() {
        assert!(!request_error(401).is_retryable());
    }

    #[test]
    fn test_http_429_retryable() {
        assert!(request_error(429).is_retryable());
    }

    #[test]
    fn test_http_500_retryable() {
        assert!(request_error(500).is_retryable());
    }

    #[test]
    fn test_http_503_retryable() {
        assert!(request_error(503).is_retryable());
    }

    #[test]
    fn test_timeout_retryable() {
        let e = ApiError::Timeout(std::time::Duration::from_secs(30));
        assert!(e.is_retryable());
    }

    #[test]
    fn test_json_not_retryable() {
        let e = ApiError::Json(serde_json::from_str::<serde_json::Value>("not json").unwrap_err());
        assert!(!e.is_retryable());
    }

    #[test]
    fn test_request_error_message_carries_diagnostics() {
        let e = request_error(403);
        let msg = e.to_string();
        assert!(msg.contains("403"));
        assert!(msg.contains("reason"));
        assert!(msg.contains("body"));
    }
}
