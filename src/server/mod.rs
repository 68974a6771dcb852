//! HTTP server implementation for redhttp-rs.
//!
//! This module builds responses, writes them with HTTP/1.0 or HTTP/0.9
//! framing and runs a serial accept loop that passes every request through
//! a list of handlers.

mod config;
mod connection;
mod content;
mod context;
mod error;
mod handler;
mod http_server;
mod response;
mod status;

// Re-export public items
pub use config::{ServerConfig, DEFAULT_SIGNATURE};
pub use connection::Connection;
pub use content::{Content, ReleaseFn};
pub use context::ServerContext;
pub use error::Error;
pub use handler::{count_requests, log_request, remove_trailing_slash, HandlerFn, Route};
pub use http_server::HttpServer;
pub use response::{escape_html, HttpResponse};
pub use status::StatusCode;
