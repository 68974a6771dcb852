//! Error types for the HTTP parser.

use thiserror::Error;

/// Errors that can occur while reading an HTTP request.
#[derive(Debug, Error)]
pub enum Error {
    /// The connection closed before a status line arrived.
    #[error("Connection closed before a request was received")]
    ConnectionClosed,

    /// The status line was empty.
    #[error("Empty request line")]
    EmptyRequest,

    /// The status line is malformed (no method or no path).
    #[error("Malformed request line: {0}")]
    MalformedRequestLine(String),

    /// A header required to read the request body is missing.
    #[error("Required header is missing: {0}")]
    MissingHeader(String),

    /// The Content-Length header is not a number.
    #[error("Invalid Content-Length: {0}")]
    InvalidContentLength(String),

    /// The body ended before Content-Length bytes were read.
    #[error("Request content truncated: expected {expected} bytes, read {read}")]
    IncompleteContent { expected: usize, read: usize },

    /// I/O error while reading from the connection.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error parsing JSON.
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error should be answered with `400 Bad Request`.
    ///
    /// I/O failures and closed connections are not; there is nobody left to
    /// answer.
    pub fn is_bad_request(&self) -> bool {
        !matches!(
            self,
            Error::ConnectionClosed | Error::IoError(_) | Error::JsonError(_)
        )
    }
}
