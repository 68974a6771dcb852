//! A minimal HTTP/1.0 and HTTP/0.9 server library.
//!
//! redhttp-rs reads a request from a connection, runs it through a list of
//! handlers and writes a single response before closing the connection.
//!
//! # Features
//!
//! - Request parsing for HTTP/1.0 and the header-less HTTP/0.9
//! - Ordered, case-insensitive header lists that keep repeated keys
//! - Query string and url-encoded form arguments
//! - `Accept` header content negotiation with q-values
//! - Responses with owned, static or caller-released content
//! - JSON request and response bodies
//!
//! # Examples
//!
//! ## Parsing a request
//!
//! ```
//! use redhttp::parse_request;
//!
//! let request = parse_request(b"GET /search?q=rust+http HTTP/1.0\r\nHost: example.com\r\n\r\n").unwrap();
//!
//! assert_eq!(request.path(), "/search");
//! assert_eq!(request.argument("q"), Some("rust http"));
//! assert_eq!(request.header("host"), Some("example.com"));
//! assert_eq!(request.url(), "http://example.com/search?q=rust+http");
//! ```
//!
//! ## Content negotiation
//!
//! ```
//! use redhttp::negotiate::negotiate_type;
//!
//! let chosen = negotiate_type(
//!     Some("text/html,application/xhtml+xml;q=0.9,*/*;q=0.8"),
//!     "application/json,text/html",
//!     "text/plain",
//! );
//! assert_eq!(chosen, "text/html");
//! ```
//!
//! ## Handlers
//!
//! ```
//! use redhttp::{HttpResponse, HttpServer, Method, ServerConfig, StatusCode};
//!
//! let mut server = HttpServer::new(ServerConfig::default());
//! server.add_handler(None, None, redhttp::server::count_requests);
//! server.add_handler(Some(Method::GET), Some("/hello"), |_request, _context| {
//!     Some(
//!         HttpResponse::typed(StatusCode::OK, "text/plain")
//!             .with_body_string("Hello, world!"),
//!     )
//! });
//! ```
//!
//! See `demos/negotiating_server.rs` for a complete server.

pub mod headers;
pub mod negotiate;
pub mod parser;
pub mod server;

// Re-export commonly used items for convenience
pub use headers::HeaderList;
pub use parser::{parse_request, Error as ParserError, HttpRequest, HttpVersion, Method};
pub use server::{Error as ServerError, HttpResponse, HttpServer, ServerConfig, ServerContext, StatusCode};
