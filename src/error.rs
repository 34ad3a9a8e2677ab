// ABOUTME: Error types for network operations; extraction itself never fails.
// ABOUTME: FetchError distinguishes rate limiting so callers can back off.

/// Errors from fetching job pages. Extraction over HTML already in hand
/// cannot fail, so only the network layer carries an error type.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("invalid job URL: {0}")]
    InvalidUrl(String),

    /// HTTP 429 from the guest API. The caller should slow down and retry
    /// later; this crate does not retry on its own.
    #[error("rate limited by the guest API")]
    RateLimited,

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("network error")]
    Network(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages_are_useful() {
        let err = FetchError::InvalidUrl("not-a-url".to_string());
        assert_eq!(err.to_string(), "invalid job URL: not-a-url");
        assert_eq!(
            FetchError::RateLimited.to_string(),
            "rate limited by the guest API"
        );
        assert_eq!(FetchError::Status(503).to_string(), "unexpected HTTP status 503");
    }
}
