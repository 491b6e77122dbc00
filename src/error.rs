// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Error types for Koukku
//!
//! Hooked methods and header setters forward the errors of the code they wrap
//! unchanged, so most variants here describe failures of the wrapped host
//! mechanism rather than of the interception layer itself.

use thiserror::Error;

/// Result type alias for Koukku operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Koukku
#[derive(Error, Debug)]
pub enum Error {
    /// A method slot held nothing callable when it was invoked
    #[error("{method} is not a function")]
    NotCallable { method: String },

    /// A deferred outcome was awaited through a synchronous call path
    #[error("{method} returned a deferred result; call it asynchronously")]
    Deferred { method: String },

    /// A header name or value was rejected by the request
    #[error("Invalid header '{name}': {reason}")]
    InvalidHeader { name: String, reason: String },

    /// The request object is not in a state that allows the operation
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Uninstall was requested after a newer watch took over the slot
    #[error("Watch on '{header}' was superseded by a later override")]
    WatchSuperseded { header: String },

    /// Token could not be decoded
    #[error("Token error: {0}")]
    Token(String),

    /// An observer rejected the value it was handed
    #[error("Observer error: {0}")]
    Observer(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a not-callable error for a method name
    pub fn not_callable(method: impl Into<String>) -> Self {
        Error::NotCallable {
            method: method.into(),
        }
    }

    /// Create an invalid header error
    pub fn invalid_header(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidHeader {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a token error
    pub fn token<S: Into<String>>(msg: S) -> Self {
        Error::Token(msg.into())
    }

    /// Create an observer error
    pub fn observer<S: Into<String>>(msg: S) -> Self {
        Error::Observer(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }

    /// Check if the error came from invoking a missing method
    pub fn is_not_callable(&self) -> bool {
        matches!(self, Error::NotCallable { .. })
    }

    /// Check if this is a network error
    pub fn is_network(&self) -> bool {
        matches!(self, Error::Http(_))
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}

/// Helper trait for adding context to errors
pub trait ErrorContext<T> {
    /// Add operation context to error
    fn context(self, msg: &str) -> Result<T>;
}

impl<T, E: Into<Error>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, msg: &str) -> Result<T> {
        self.map_err(|e| {
            let err = e.into();
            Error::Other(format!("{}: {}", msg, err))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_callable_message() {
        let err = Error::not_callable("fetchData");
        assert!(err.is_not_callable());
        assert_eq!(err.to_string(), "fetchData is not a function");
    }

    #[test]
    fn test_context() {
        let result: std::result::Result<(), &str> = Err("bad padding");
        let err = result.context("decoding token").unwrap_err();
        assert_eq!(err.to_string(), "decoding token: bad padding");
    }
}
