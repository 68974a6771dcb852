//! HTTP request parsing.
//!
//! This module turns the bytes of an HTTP/1.0 or HTTP/0.9 request into an
//! [`HttpRequest`]: the status line, the header block and, for form posts,
//! the url-encoded body.

mod request;
mod method;
mod version;
mod error;
mod query;
mod reader;

// Re-export public items
pub use request::HttpRequest;
pub use method::Method;
pub use version::HttpVersion;
pub use error::Error;
pub use query::{parse_arguments, url_escape, url_unescape};

// Re-export the request readers
pub use request::{parse_request, read_request, read_request_content};
