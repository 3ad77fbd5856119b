//! Error types for the fetching layer.

use std::fmt;

/// Errors produced while fetching an emoji asset over HTTP.
#[derive(Debug, Clone)]
pub enum FetchError {
    /// HTTP request failed.
    Request(String),
    /// Invalid URL provided.
    InvalidUrl(String),
    /// Request timed out.
    Timeout,
    /// Connection refused or failed.
    Connection(String),
    /// HTTP error status (4xx or 5xx).
    HttpStatus {
        /// The HTTP status code.
        status: u16,
        /// The URL that produced the status.
        url: String,
    },
    /// Redirect limit exceeded.
    TooManyRedirects,
    /// The response body could not be read.
    InvalidBody(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request(msg) => write!(f, "HTTP request error: {msg}"),
            Self::InvalidUrl(msg) => write!(f, "Invalid URL: {msg}"),
            Self::Timeout => write!(f, "Request timed out"),
            Self::Connection(msg) => write!(f, "Connection error: {msg}"),
            Self::HttpStatus { status, url } => write!(f, "HTTP {status} for {url}"),
            Self::TooManyRedirects => write!(f, "Too many redirects"),
            Self::InvalidBody(msg) => write!(f, "Invalid response body: {msg}"),
        }
    }
}

impl std::error::Error for FetchError {}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Connection(err.to_string())
        } else if err.is_redirect() {
            Self::TooManyRedirects
        } else if err.is_body() || err.is_decode() {
            Self::InvalidBody(err.to_string())
        } else {
            Self::Request(err.to_string())
        }
    }
}

impl From<url::ParseError> for FetchError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}

/// A specialized Result type for fetch operations.
pub type Result<T> = std::result::Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display_includes_url() {
        let err = FetchError::HttpStatus {
            status: 404,
            url: "https://example.com/1f600.svg".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 404 for https://example.com/1f600.svg");
    }

    #[test]
    fn test_url_parse_error_conversion() {
        let err: FetchError = url::Url::parse("not a url").unwrap_err().into();
        assert!(matches!(err, FetchError::InvalidUrl(_)));
    }
}
