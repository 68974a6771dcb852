//! HTTP protocol versions.

use std::fmt;

/// The protocol version named on a request's status line.
///
/// A status line without an `HTTP/` suffix is an HTTP/0.9 request: no
/// headers are read and the response is sent without a status line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum HttpVersion {
    #[default]
    Http09,
    Http10,
    Http11,
    /// Any other version string, kept verbatim.
    Other(String),
}

impl HttpVersion {
    /// Build a version from the text following `HTTP/`.
    pub fn from_suffix(suffix: &str) -> Self {
        match suffix {
            "0.9" => HttpVersion::Http09,
            "1.0" => HttpVersion::Http10,
            "1.1" => HttpVersion::Http11,
            other => HttpVersion::Other(other.to_string()),
        }
    }

    /// The numeric version string, e.g. `"1.0"`.
    pub fn as_str(&self) -> &str {
        match self {
            HttpVersion::Http09 => "0.9",
            HttpVersion::Http10 => "1.0",
            HttpVersion::Http11 => "1.1",
            HttpVersion::Other(version) => version,
        }
    }

    /// Whether this is the header-less HTTP/0.9 protocol.
    pub fn is_http09(&self) -> bool {
        *self == HttpVersion::Http09
    }
}

impl fmt::Display for HttpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
