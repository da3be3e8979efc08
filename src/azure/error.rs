//! Tracking-service API error types.
//!
//! This module defines error types that distinguish between transient and
//! permanent service failures. The distinction drives the retry logic:
//!
//! - **Transient** errors are retriable (5xx, rate limits, timeouts,
//!   connection failures)
//! - **Permanent** errors require operator intervention (auth failures,
//!   malformed queries, missing items)

use std::fmt;
use thiserror::Error;

/// The kind of API error, categorized for retry decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// Transient error - safe to retry with backoff.
    ///
    /// Examples:
    /// - HTTP 5xx (server errors)
    /// - HTTP 429 (rate limited)
    /// - HTTP 408 (request timeout)
    /// - Network timeouts and connection failures
    Transient,

    /// Permanent error - requires operator intervention.
    ///
    /// Examples:
    /// - HTTP 401/403 (bad or expired access token)
    /// - HTTP 404 (work item or project not found)
    /// - HTTP 400 (malformed query)
    /// - Response body that fails to decode
    Permanent,
}

impl ApiErrorKind {
    /// Returns true if this error is retriable.
    pub fn is_retriable(&self) -> bool {
        matches!(self, ApiErrorKind::Transient)
    }
}

/// A tracking-service API error with categorization for retry decisions.
#[derive(Debug, Error)]
pub struct ApiError {
    /// The kind of error (transient or permanent).
    pub kind: ApiErrorKind,

    /// The HTTP status code, if the request got as far as a response.
    pub status: Option<u16>,

    /// A human-readable description of the error.
    pub message: String,

    /// The underlying transport error, if available.
    #[source]
    pub source: Option<reqwest::Error>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(code) => write!(f, "service error (HTTP {}): {}", code, self.message),
            None => write!(f, "service error: {}", self.message),
        }
    }
}

impl ApiError {
    /// Categorizes a transport-level reqwest error (no HTTP response).
    ///
    /// Timeouts and connection failures are transient; everything else
    /// (request construction, body handling) is permanent.
    pub fn from_transport(source: reqwest::Error) -> Self {
        let kind = if source.is_timeout() || source.is_connect() {
            ApiErrorKind::Transient
        } else {
            ApiErrorKind::Permanent
        };
        ApiError {
            kind,
            status: source.status().map(|s| s.as_u16()),
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// Categorizes a non-success HTTP response by status code.
    ///
    /// `body` is the response text, included in the message so operators see
    /// what the service actually said.
    pub fn from_status(status: u16, body: &str) -> Self {
        let body = body.trim();
        let message = if body.is_empty() {
            format!("request failed with HTTP {}", status)
        } else {
            format!("request failed with HTTP {}: {}", status, body)
        };
        ApiError {
            kind: classify_status(status),
            status: Some(status),
            message,
            source: None,
        }
    }

    /// Creates a permanent error for a response that decoded to an
    /// unexpected shape.
    pub fn decode(message: impl Into<String>, source: reqwest::Error) -> Self {
        ApiError {
            kind: ApiErrorKind::Permanent,
            status: None,
            message: message.into(),
            source: Some(source),
        }
    }

    /// Creates a transient error without an underlying transport error.
    pub fn transient_without_source(message: impl Into<String>) -> Self {
        ApiError {
            kind: ApiErrorKind::Transient,
            status: None,
            message: message.into(),
            source: None,
        }
    }

    /// Creates a permanent error without an underlying transport error.
    pub fn permanent_without_source(message: impl Into<String>) -> Self {
        ApiError {
            kind: ApiErrorKind::Permanent,
            status: None,
            message: message.into(),
            source: None,
        }
    }
}

/// Maps an HTTP status code to an error kind.
fn classify_status(status: u16) -> ApiErrorKind {
    match status {
        408 | 429 => ApiErrorKind::Transient,
        500..=599 => ApiErrorKind::Transient,
        _ => ApiErrorKind::Permanent,
    }
}
