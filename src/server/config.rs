//! Server configuration.

use std::net::SocketAddr;

/// The default `Server` header value.
pub const DEFAULT_SIGNATURE: &str = concat!("redhttp-rs/", env!("CARGO_PKG_VERSION"));

/// HTTP server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// The address to bind to.
    pub addr: SocketAddr,
    /// The initial size of the line buffer used to read request heads.
    pub read_buffer_size: usize,
    /// The value of the `Server` response header; `None` omits the header.
    pub signature: Option<String>,
}

impl ServerConfig {
    pub fn with_addr(mut self, addr: SocketAddr) -> Self {
        self.addr = addr;
        self
    }

    pub fn with_read_buffer_size(mut self, read_buffer_size: usize) -> Self {
        self.read_buffer_size = read_buffer_size;
        self
    }

    pub fn with_signature(mut self, signature: Option<String>) -> Self {
        self.signature = signature;
        self
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            read_buffer_size: 8192,
            signature: Some(DEFAULT_SIGNATURE.to_string()),
        }
    }
}
