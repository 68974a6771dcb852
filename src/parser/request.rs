//! HTTP request parsing and representation.

use std::cell::OnceCell;
use std::io::Read;
use std::net::{IpAddr, SocketAddr};

use log::debug;
use serde::de::DeserializeOwned;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::headers::HeaderList;
use crate::negotiate::{negotiate_type, NegotiationList};
use crate::parser::error::Error;
use crate::parser::method::Method;
use crate::parser::query::{parse_arguments, url_unescape};
use crate::parser::reader::{read_line, read_line_blocking};
use crate::parser::version::HttpVersion;

/// Initial capacity of the line buffer used by [`parse_request`].
const LINE_BUFFER_SIZE: usize = 8192;

/// Upper bound on the up-front allocation for a request body.
const MAX_CONTENT_PREALLOCATION: usize = 64 * 1024;

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Represents an HTTP request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    method: Method,
    path_and_query: String,
    path: String,
    query_string: Option<String>,
    version: HttpVersion,
    headers: HeaderList,
    arguments: HeaderList,
    path_glob: Option<String>,
    host: OnceCell<String>,
    url: OnceCell<String>,
    content: Option<Vec<u8>>,
    local_addr: Option<SocketAddr>,
    remote_addr: Option<SocketAddr>,
    signature: Option<String>,
}

impl HttpRequest {
    /// Create a new HTTP request.
    ///
    /// # Arguments
    ///
    /// * `method` - The HTTP method
    /// * `path_and_query` - The path as sent on the status line, query string included
    /// * `version` - The HTTP version
    ///
    /// # Returns
    ///
    /// A new request whose path is percent-decoded and whose arguments hold
    /// the parsed query string
    pub fn new(method: Method, path_and_query: impl Into<String>, version: HttpVersion) -> Self {
        let path_and_query = path_and_query.into();
        let mut arguments = HeaderList::new();

        let (path, query_string) = match path_and_query.split_once('?') {
            Some((path, query)) => {
                parse_arguments(query, &mut arguments);
                (path, Some(query.to_string()))
            }
            None => (path_and_query.as_str(), None),
        };
        let path = url_unescape(path);

        Self {
            method,
            path,
            query_string,
            path_and_query,
            version,
            headers: HeaderList::new(),
            arguments,
            path_glob: None,
            host: OnceCell::new(),
            url: OnceCell::new(),
            content: None,
            local_addr: None,
            remote_addr: None,
            signature: None,
        }
    }

    /// Attach the local and remote socket addresses of the connection.
    pub fn with_addresses(mut self, local: Option<SocketAddr>, remote: Option<SocketAddr>) -> Self {
        self.local_addr = local;
        self.remote_addr = remote;
        self
    }

    /// Attach the signature sent in the `Server` response header.
    pub fn with_signature(mut self, signature: Option<String>) -> Self {
        self.signature = signature;
        self
    }

    /// Add a header, keeping any existing header of the same name.
    pub fn with_header(mut self, key: impl Into<String>, value: impl AsRef<str>) -> Self {
        self.add_header(key, value);
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn set_method(&mut self, method: Method) {
        self.method = method;
    }

    /// The raw path and query string from the status line.
    pub fn path_and_query(&self) -> &str {
        &self.path_and_query
    }

    /// The percent-decoded path, without the query string.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn set_path(&mut self, path: impl Into<String>) {
        self.path = path.into();
    }

    /// The raw query string, if the request had a `?`.
    pub fn query_string(&self) -> Option<&str> {
        self.query_string.as_deref()
    }

    pub fn version(&self) -> &HttpVersion {
        &self.version
    }

    pub fn headers(&self) -> &HeaderList {
        &self.headers
    }

    /// Get the value of the first header called `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// Check if a header exists.
    pub fn has_header(&self, name: &str) -> bool {
        self.headers.exists(name)
    }

    pub fn add_header(&mut self, key: impl Into<String>, value: impl AsRef<str>) {
        self.headers.add(key, value);
    }

    /// Query string and form arguments, in the order they were parsed.
    pub fn arguments(&self) -> &HeaderList {
        &self.arguments
    }

    /// Get the value of the first argument called `name`.
    pub fn argument(&self, name: &str) -> Option<&str> {
        self.arguments.get(name)
    }

    /// Check if an argument exists, with or without a value.
    pub fn argument_exists(&self, name: &str) -> bool {
        self.arguments.exists(name)
    }

    /// The part of the path matched by a trailing `*` in the route.
    pub fn path_glob(&self) -> Option<&str> {
        self.path_glob.as_deref()
    }

    /// Store the wildcard-matched tail of the path. Empty globs are cleared.
    pub fn set_path_glob(&mut self, path_glob: Option<&str>) {
        self.path_glob = path_glob
            .filter(|glob| !glob.is_empty())
            .map(str::to_string);
    }

    /// The request body, when one was read.
    pub fn content(&self) -> Option<&[u8]> {
        self.content.as_deref()
    }

    pub fn content_length(&self) -> usize {
        self.content.as_ref().map_or(0, Vec::len)
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    pub fn remote_addr(&self) -> Option<SocketAddr> {
        self.remote_addr
    }

    /// The signature of the server that accepted this request.
    pub fn signature(&self) -> Option<&str> {
        self.signature.as_deref()
    }

    /// The host this request was addressed to.
    ///
    /// Uses the `Host` header when present, otherwise the local address of
    /// the connection, leaving out the port when it is 80. Computed once.
    pub fn host(&self) -> &str {
        self.host.get_or_init(|| {
            if let Some(host) = self.header("Host") {
                return host.to_string();
            }
            match self.local_addr {
                Some(addr) if addr.port() == 80 => match addr.ip() {
                    IpAddr::V6(ip) => format!("[{ip}]"),
                    ip => ip.to_string(),
                },
                Some(addr) => addr.to_string(),
                None => "localhost".to_string(),
            }
        })
    }

    /// The absolute URL of this request, `http://<host><path_and_query>`.
    pub fn url(&self) -> &str {
        self.url
            .get_or_init(|| format!("http://{}{}", self.host(), self.path_and_query))
    }

    /// The client's `Accept` header as a negotiation list.
    pub fn accept(&self) -> NegotiationList {
        self.header("Accept")
            .map(NegotiationList::parse)
            .unwrap_or_default()
    }

    /// Choose one of `server_types` (an `Accept`-style list) for this client,
    /// falling back to `default`.
    pub fn negotiate_type(&self, server_types: &str, default: &str) -> String {
        negotiate_type(self.header("Accept"), server_types, default)
    }

    /// Check if the request has a JSON body.
    ///
    /// # Returns
    ///
    /// true if the Content-Type header is application/json, false otherwise
    pub fn is_json(&self) -> bool {
        self.header("Content-Type")
            .is_some_and(|content_type| content_type.starts_with("application/json"))
    }

    /// Parse the request body as JSON.
    ///
    /// # Returns
    ///
    /// The parsed JSON value, or an error if the body is not valid JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        if !self.is_json() {
            return Err(Error::MissingHeader("Content-Type: application/json".to_string()));
        }
        let json = serde_json::from_slice(self.content().unwrap_or_default())?;
        Ok(json)
    }

    fn store_form_content(&mut self, content: Vec<u8>) {
        parse_arguments(&String::from_utf8_lossy(&content), &mut self.arguments);
        self.content = Some(content);
    }
}

/// Parse a status line such as `GET /index.html HTTP/1.0`.
///
/// The method is the leading alphabetic run, upper-cased. When the line ends
/// in `HTTP/<version>` (any case) that version is used and removed from the
/// path; otherwise the request is HTTP/0.9.
fn parse_status_line(line: &str) -> Result<HttpRequest, Error> {
    if line.is_empty() {
        return Err(Error::EmptyRequest);
    }

    let line = line.trim_start();
    let method_end = line
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(line.len());
    let (method, rest) = line.split_at(method_end);
    if method.is_empty() {
        return Err(Error::MalformedRequestLine(line.to_string()));
    }
    let method: Method = method.parse()?;

    let rest = rest.trim();
    if rest.is_empty() {
        return Err(Error::MalformedRequestLine(line.to_string()));
    }

    let (path_and_query, version) = match rest.rsplit_once(char::is_whitespace) {
        Some((path, last)) if last.get(..5).is_some_and(|p| p.eq_ignore_ascii_case("HTTP/")) => {
            (path.trim_end(), HttpVersion::from_suffix(&last[5..]))
        }
        _ => (rest, HttpVersion::Http09),
    };

    debug!("Request line: {method} {path_and_query} (HTTP/{version})");
    Ok(HttpRequest::new(method, path_and_query, version))
}

/// The number of form bytes to read after the headers, if any.
///
/// Only `POST` requests above HTTP/0.9 carry a body at this layer; both
/// `Content-Type` and `Content-Length` must be present. Bodies that are not
/// url-encoded forms are left on the connection.
fn form_content_length(request: &HttpRequest) -> Result<Option<usize>, Error> {
    if request.version.is_http09() || request.method != Method::POST {
        return Ok(None);
    }

    let content_type = request
        .header("Content-Type")
        .ok_or_else(|| Error::MissingHeader("Content-Type".to_string()))?;
    let content_length = request
        .header("Content-Length")
        .ok_or_else(|| Error::MissingHeader("Content-Length".to_string()))?;

    let media_type = content_type.split(';').next().unwrap_or_default().trim();
    if !media_type.eq_ignore_ascii_case(FORM_URLENCODED) {
        return Ok(None);
    }

    parse_content_length(content_length).map(Some)
}

fn parse_content_length(value: &str) -> Result<usize, Error> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::InvalidContentLength(value.to_string()))
}

async fn read_content<R>(reader: &mut R, length: usize) -> Result<Vec<u8>, Error>
where
    R: AsyncRead + Unpin,
{
    let mut content = Vec::with_capacity(length.min(MAX_CONTENT_PREALLOCATION));
    let read = AsyncReadExt::take(reader, length as u64)
        .read_to_end(&mut content)
        .await?;
    if read != length {
        return Err(Error::IncompleteContent { expected: length, read });
    }
    Ok(content)
}

/// Read an HTTP request from a connection.
///
/// # Arguments
///
/// * `reader` - The connection to read from, ideally buffered
/// * `line_capacity` - Initial size of the line buffer
///
/// # Returns
///
/// The parsed request, or an error if the status line is missing or
/// malformed or a form body could not be read
pub async fn read_request<R>(reader: &mut R, line_capacity: usize) -> Result<HttpRequest, Error>
where
    R: AsyncRead + Unpin,
{
    let line = read_line(reader, line_capacity)
        .await?
        .ok_or(Error::ConnectionClosed)?;
    let mut request = parse_status_line(&line)?;

    if !request.version.is_http09() {
        loop {
            match read_line(reader, line_capacity).await {
                Ok(Some(line)) if !line.is_empty() => request.headers.parse_line(&line),
                Ok(_) => break,
                Err(e) => {
                    debug!("Stopped reading headers: {e}");
                    break;
                }
            }
        }
    }

    if let Some(length) = form_content_length(&request)? {
        let content = read_content(reader, length).await?;
        request.store_form_content(content);
    }

    Ok(request)
}

/// Read a body the parser left on the connection.
///
/// Does nothing when the body was already read or the request has no
/// `Content-Length`.
pub async fn read_request_content<R>(reader: &mut R, request: &mut HttpRequest) -> Result<(), Error>
where
    R: AsyncRead + Unpin,
{
    if request.content.is_some() {
        return Ok(());
    }
    let Some(length) = request.header("Content-Length") else {
        return Ok(());
    };
    let length = parse_content_length(length)?;
    request.content = Some(read_content(reader, length).await?);
    Ok(())
}

/// Parse an HTTP request held in memory.
///
/// # Arguments
///
/// * `input` - A byte slice containing the HTTP request to parse
///
/// # Returns
///
/// The parsed HTTP request, or an error if the request is invalid
pub fn parse_request(input: &[u8]) -> Result<HttpRequest, Error> {
    let mut reader = input;

    let line = read_line_blocking(&mut reader, LINE_BUFFER_SIZE)?.ok_or(Error::EmptyRequest)?;
    let mut request = parse_status_line(&line)?;

    if !request.version.is_http09() {
        while let Some(line) = read_line_blocking(&mut reader, LINE_BUFFER_SIZE)? {
            if line.is_empty() {
                break;
            }
            request.headers.parse_line(&line);
        }
    }

    if let Some(length) = form_content_length(&request)? {
        let mut content = Vec::with_capacity(length.min(MAX_CONTENT_PREALLOCATION));
        let read = Read::take(reader, length as u64).read_to_end(&mut content)?;
        if read != length {
            return Err(Error::IncompleteContent { expected: length, read });
        }
        request.store_form_content(content);
    }

    Ok(request)
}
