//! HTTP response types and utilities.

use std::time::SystemTime;

use log::{error, warn};
use serde::Serialize;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::headers::HeaderList;
use crate::parser::{HttpRequest, HttpVersion};
use crate::server::content::Content;
use crate::server::error::Error;
use crate::server::status::StatusCode;

fn default_message(status: StatusCode) -> String {
    status.reason_phrase().unwrap_or("Unknown").to_string()
}

/// Escape text for inclusion in an HTML page.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Represents an HTTP response.
///
/// The status line and headers are written by the first call to
/// [`HttpResponse::send`]; later calls only write the content again, which
/// lets a handler flush the head before streaming a body in parts.
#[derive(Debug)]
pub struct HttpResponse {
    status: StatusCode,
    status_message: String,
    headers: HeaderList,
    content: Option<Content>,
    content_length: Option<usize>,
    headers_sent: bool,
}

impl HttpResponse {
    /// Create a new HTTP response with the given status code and its
    /// standard reason phrase.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            status_message: default_message(status),
            headers: HeaderList::new(),
            content: None,
            content_length: None,
            headers_sent: false,
        }
    }

    /// Create a response that declares an empty body (`Content-Length: 0`).
    pub fn empty(status: StatusCode) -> Self {
        let mut response = Self::new(status);
        response.content_length = Some(0);
        response
    }

    /// Create a response with a `Content-Type` header.
    pub fn typed(status: StatusCode, content_type: &str) -> Self {
        let mut response = Self::new(status);
        response.add_header("Content-Type", content_type);
        response
    }

    /// Create an HTML error page for `status`.
    ///
    /// `explanation` is inserted into the page as-is; escape untrusted text
    /// with [`escape_html`] first.
    pub fn error_page(status: StatusCode, explanation: &str) -> Self {
        let mut response = Self::typed(status, "text/html");
        let page = format!(
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n\
             <!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.0 Strict//EN\"\n \
             \"http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd\">\n\
             <html xmlns=\"http://www.w3.org/1999/xhtml\">\n\
             <head><meta charset=\"utf-8\" /><title>{code} {message}</title></head>\n\
             <body>\n<h1>{code} {message}</h1>\n<p>{explanation}</p>\n</body></html>\n",
            code = status,
            message = response.status_message,
        );
        response.set_content(page);
        response
    }

    /// Create a redirect to `url`, `301 Moved Permanently` unless another
    /// status is given.
    pub fn redirect(url: &str, status: Option<StatusCode>) -> Self {
        let status = status.unwrap_or(StatusCode::MOVED_PERMANENTLY);
        let explanation = format!(
            "The document has moved <a href=\"{href}\">here</a>.",
            href = escape_html(url)
        );
        let mut response = Self::error_page(status, &explanation);
        response.add_header("Location", url);
        response
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Change the status code, resetting the message to its reason phrase.
    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
        self.status_message = default_message(status);
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    pub fn set_status_message(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
    }

    /// Replace the status message.
    pub fn with_status_message(mut self, message: impl Into<String>) -> Self {
        self.set_status_message(message);
        self
    }

    pub fn headers(&self) -> &HeaderList {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// Append a header, keeping any existing header of the same name.
    pub fn add_header(&mut self, key: impl Into<String>, value: impl AsRef<str>) {
        self.headers.add(key, value);
    }

    /// Add or replace a header.
    pub fn set_header(&mut self, key: impl Into<String>, value: impl AsRef<str>) {
        self.headers.set(key, value);
    }

    /// Append a header holding `time` in RFC 1123 format.
    pub fn add_time_header(&mut self, key: impl Into<String>, time: SystemTime) {
        self.headers.add(key, httpdate::fmt_http_date(time));
    }

    /// Add or replace a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl AsRef<str>) -> Self {
        self.set_header(name, value);
        self
    }

    /// Set the content type.
    pub fn with_content_type(self, content_type: impl AsRef<str>) -> Self {
        self.with_header("Content-Type", content_type)
    }

    /// Set the response body with a string.
    pub fn with_body_string(mut self, body: impl Into<String>) -> Self {
        self.set_content(body.into());
        self
    }

    /// Set the response body with bytes.
    pub fn with_body_bytes(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.set_content(body.into());
        self
    }

    /// Set the response body with a JSON value.
    ///
    /// This method serializes the provided value to JSON and sets it as the response body.
    pub fn with_json<T: Serialize>(self, value: &T) -> Result<Self, Error> {
        let json = serde_json::to_vec(value)?;
        Ok(self
            .with_header("Content-Type", "application/json")
            .with_body_bytes(json))
    }

    /// Copy `bytes` into a buffer owned by the response, replacing any
    /// previous content.
    pub fn copy_content(&mut self, bytes: &[u8]) {
        self.set_content(Content::copied(bytes));
    }

    /// Hand `content` over to the response, replacing (and releasing) any
    /// previous content.
    ///
    /// Empty content leaves the response without a body and a length of 0.
    pub fn set_content(&mut self, content: impl Into<Content>) {
        let content = content.into();
        self.content = None;
        self.content_length = Some(content.len());
        if !content.is_empty() {
            self.content = Some(content);
        }
    }

    pub fn content(&self) -> Option<&[u8]> {
        self.content.as_ref().map(Content::as_bytes)
    }

    /// The declared body length, or `None` when it is not known.
    pub fn content_length(&self) -> Option<usize> {
        self.content_length
    }

    /// Whether the status line and headers have already been written.
    pub fn headers_sent(&self) -> bool {
        self.headers_sent
    }

    /// Write the response for `request` to `out`.
    ///
    /// See [`HttpResponse::send_with`].
    pub async fn send<W>(&mut self, request: &HttpRequest, out: &mut W)
    where
        W: AsyncWrite + Unpin,
    {
        self.send_with(request.version(), request.signature(), out)
            .await;
    }

    /// Write the response to `out`.
    ///
    /// The first call completes the headers (`Content-Length` when known,
    /// `Date`, `Connection: close` and `Server` when a signature is given)
    /// and writes the status line and header block, unless `version` is
    /// HTTP/0.9. Every call then writes the attached content. Write failures
    /// are logged and otherwise ignored.
    pub async fn send_with<W>(&mut self, version: &HttpVersion, signature: Option<&str>, out: &mut W)
    where
        W: AsyncWrite + Unpin,
    {
        if !self.headers_sent {
            if let Some(length) = self.content_length {
                self.headers.add("Content-Length", length.to_string());
            }
            self.add_time_header("Date", SystemTime::now());
            self.headers.add("Connection", "close");
            if let Some(signature) = signature {
                self.headers.add("Server", signature);
            }

            if !version.is_http09() {
                let mut head = format!("HTTP/1.0 {} {}\r\n", self.status, self.status_message).into_bytes();
                self.headers.write_to(&mut head);
                head.extend_from_slice(b"\r\n");
                if let Err(e) = out.write_all(&head).await {
                    error!("Failed to write response headers: {e}");
                }
            }

            self.headers_sent = true;
        }

        if let Some(content) = &self.content {
            if let Err(e) = out.write_all(content.as_bytes()).await {
                error!("Failed to write response to client: {e}");
            }
        }

        if let Err(e) = out.flush().await {
            warn!("Failed to flush response: {e}");
        }
    }
}
