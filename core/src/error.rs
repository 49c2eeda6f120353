//! Error types for the widget core.
//!
//! # Design
//! Fetch-level errors carry the taxonomy consumers branch on: "the network is
//! unreachable" and "the call timed out" read differently on the widget than
//! "the server answered with garbage." All of them become a `Failure` fetch
//! result at the provider boundary; none of them crosses it as a panic.
//! Date-parse problems are deliberately absent here: a malformed due date is
//! logged and treated as "no due date," never surfaced as an error.

use thiserror::Error;

/// Errors produced by a single fetch attempt.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// Host resolution or connection failed.
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    /// The call exceeded the configured time bound.
    #[error("request timed out")]
    Timeout,

    /// The server answered with a non-success status.
    #[error("server returned HTTP {status}")]
    HttpStatus { status: u16 },

    /// The response body did not match the expected shape.
    #[error("malformed payload: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if error.is_decode() {
            Self::Decode(error.to_string())
        } else {
            // Connect failures, DNS failures, and any residual transport
            // problem all mean the endpoint could not be reached.
            Self::NetworkUnreachable(error.to_string())
        }
    }
}

/// The host shell rejected a rendered list. The update pipeline degrades to
/// the plain-text fallback instead of leaving a blank surface.
#[derive(Debug, Clone, Error)]
#[error("host list render failed: {0}")]
pub struct HostError(pub String);

/// Registering the periodic schedule failed (for example, no runtime is
/// available). Callers fall back to a one-shot trigger.
#[derive(Debug, Clone, Error)]
#[error("periodic registration failed: {0}")]
pub struct ScheduleError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_error_messages() {
        assert_eq!(
            FetchError::NetworkUnreachable("dns".to_string()).to_string(),
            "network unreachable: dns"
        );
        assert_eq!(FetchError::Timeout.to_string(), "request timed out");
        assert_eq!(
            FetchError::HttpStatus { status: 503 }.to_string(),
            "server returned HTTP 503"
        );
        assert_eq!(
            FetchError::Decode("expected array".to_string()).to_string(),
            "malformed payload: expected array"
        );
    }
}
