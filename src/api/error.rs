use thiserror::Error;

/// Failure talking to the bestseller API
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl ApiError {
    /// Whether a second attempt could plausibly succeed
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Network(e) => e.is_timeout() || e.is_connect(),
            ApiError::Status(code) => *code == 429 || (500..600).contains(code),
            ApiError::Malformed(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_transience() {
        assert!(ApiError::Status(429).is_transient());
        assert!(ApiError::Status(503).is_transient());
        assert!(!ApiError::Status(401).is_transient());
        assert!(!ApiError::Status(404).is_transient());
    }

    #[test]
    fn test_malformed_is_permanent() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(!ApiError::Malformed(err).is_transient());
    }
}
