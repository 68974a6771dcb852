//! A single client connection.

use std::io;
use std::net::SocketAddr;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

use crate::parser::{read_request, read_request_content, Error as ParserError, HttpRequest, HttpVersion};
use crate::server::config::ServerConfig;
use crate::server::response::HttpResponse;

/// A client connection: the buffered stream plus the addresses at each end.
#[derive(Debug)]
pub struct Connection<S> {
    stream: BufReader<S>,
    local_addr: Option<SocketAddr>,
    remote_addr: Option<SocketAddr>,
    line_capacity: usize,
    signature: Option<String>,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, local_addr: Option<SocketAddr>, remote_addr: Option<SocketAddr>) -> Self {
        let config = ServerConfig::default();
        Self {
            stream: BufReader::new(stream),
            local_addr,
            remote_addr,
            line_capacity: config.read_buffer_size,
            signature: config.signature,
        }
    }

    /// Take the line buffer size and signature from `config`.
    pub fn with_config(mut self, config: &ServerConfig) -> Self {
        self.line_capacity = config.read_buffer_size;
        self.signature = config.signature.clone();
        self
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    pub fn remote_addr(&self) -> Option<SocketAddr> {
        self.remote_addr
    }

    pub fn signature(&self) -> Option<&str> {
        self.signature.as_deref()
    }

    /// Read the next request, tagged with this connection's addresses and
    /// signature.
    pub async fn read_request(&mut self) -> Result<HttpRequest, ParserError> {
        let request = read_request(&mut self.stream, self.line_capacity).await?;
        Ok(request
            .with_addresses(self.local_addr, self.remote_addr)
            .with_signature(self.signature.clone()))
    }

    /// Read a body the parser left on the connection.
    pub async fn read_content(&mut self, request: &mut HttpRequest) -> Result<(), ParserError> {
        read_request_content(&mut self.stream, request).await
    }

    /// Send `response` framed for `request`.
    pub async fn send(&mut self, response: &mut HttpResponse, request: &HttpRequest) {
        response.send(request, &mut self.stream).await;
    }

    /// Send `response` framed for `version`, for answers to requests that
    /// could not be parsed.
    pub async fn send_with_version(&mut self, response: &mut HttpResponse, version: &HttpVersion) {
        let signature = self.signature.clone();
        response
            .send_with(version, signature.as_deref(), &mut self.stream)
            .await;
    }

    /// Shut down the write side of the connection.
    pub async fn close(mut self) -> io::Result<()> {
        self.stream.shutdown().await
    }

    pub fn into_inner(self) -> S {
        self.stream.into_inner()
    }
}
