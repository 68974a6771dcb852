//! HTTP server implementation.

use std::net::SocketAddr;
use std::time::Duration;

use log::{debug, error, info, warn};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpListener;
use tokio::signal;

use crate::parser::{Error as ParserError, HttpRequest, HttpVersion, Method};
use crate::server::config::ServerConfig;
use crate::server::connection::Connection;
use crate::server::context::ServerContext;
use crate::server::error::Error;
use crate::server::handler::{PathMatch, Route};
use crate::server::response::{escape_html, HttpResponse};
use crate::server::status::StatusCode;

/// An HTTP server.
///
/// Connections are served one at a time: each request is read, passed
/// through the handlers in registration order and answered before the next
/// connection is accepted.
pub struct HttpServer {
    /// The server configuration.
    pub config: ServerConfig,
    routes: Vec<Route>,
    context: ServerContext,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ServerConfig) -> Self {
        let context = ServerContext::new(config.signature.clone());
        Self {
            config,
            routes: Vec::new(),
            context,
        }
    }

    /// Register a handler.
    ///
    /// `method` and `path` restrict which requests reach the handler; `None`
    /// matches everything. A path ending in `*` matches any request path that
    /// starts with the part before it, and the rest is available from
    /// [`HttpRequest::path_glob`].
    pub fn add_handler<F>(&mut self, method: Option<Method>, path: Option<&str>, handler: F)
    where
        F: Fn(&HttpRequest, &mut ServerContext) -> Option<HttpResponse> + Send + Sync + 'static,
    {
        self.routes.push(Route {
            method,
            path: path.map(str::to_string),
            handler: Box::new(handler),
        });
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn context(&self) -> &ServerContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut ServerContext {
        &mut self.context
    }

    /// Find a response for `request`.
    ///
    /// Matching handlers run in registration order until one returns a
    /// response. When none does, the answer is `405 Method Not Allowed` if a
    /// route with a path matched everything but the method, and
    /// `404 Not Found` otherwise.
    pub fn dispatch(&mut self, request: &mut HttpRequest) -> HttpResponse {
        let path = request.path().to_string();
        let mut allowed: Vec<Method> = Vec::new();

        for route in &self.routes {
            let Some(matched) = route.match_path(&path) else {
                continue;
            };

            if !route.match_method(request.method()) {
                if let (PathMatch::Exact | PathMatch::Glob(_), Some(method)) = (matched, &route.method) {
                    if !allowed.contains(method) {
                        allowed.push(method.clone());
                    }
                }
                continue;
            }

            let glob = match matched {
                PathMatch::Glob(glob) => Some(glob),
                PathMatch::Any | PathMatch::Exact => None,
            };
            request.set_path_glob(glob);

            if let Some(response) = (route.handler)(request, &mut self.context) {
                return response;
            }
        }
        request.set_path_glob(None);

        if allowed.is_empty() {
            let explanation = format!(
                "The requested URL {path} was not found on this server.",
                path = escape_html(&path)
            );
            return HttpResponse::error_page(StatusCode::NOT_FOUND, &explanation);
        }

        let allowed = allowed
            .iter()
            .map(Method::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        let explanation = format!(
            "The method {method} is not allowed for the URL {path}.",
            method = escape_html(request.method().as_str()),
            path = escape_html(&path)
        );
        let mut response = HttpResponse::error_page(StatusCode::METHOD_NOT_ALLOWED, &explanation);
        response.add_header("Allow", allowed);
        response
    }

    /// Serve a single request on `stream` and shut the stream down.
    ///
    /// Requests that cannot be parsed are answered with `400 Bad Request` and
    /// the parse error is returned. A client that disconnects without sending
    /// anything is not an error.
    pub async fn handle_connection<S>(
        &mut self,
        stream: S,
        local_addr: Option<SocketAddr>,
        remote_addr: Option<SocketAddr>,
    ) -> Result<(), Error>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let mut connection = Connection::new(stream, local_addr, remote_addr).with_config(&self.config);
        let result = self.serve(&mut connection).await;
        if let Err(e) = connection.close().await {
            debug!("Failed to shut down connection: {e}");
        }
        result
    }

    async fn serve<S>(&mut self, connection: &mut Connection<S>) -> Result<(), Error>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        match connection.read_request().await {
            Ok(mut request) => {
                let mut response = self.dispatch(&mut request);
                connection.send(&mut response, &request).await;
                Ok(())
            }
            Err(ParserError::ConnectionClosed) => {
                debug!("Connection closed before a request was received");
                Ok(())
            }
            Err(e) if e.is_bad_request() => {
                warn!("Bad request: {e}");
                let mut response = HttpResponse::error_page(StatusCode::BAD_REQUEST, &escape_html(&e.to_string()));
                connection
                    .send_with_version(&mut response, &HttpVersion::Http10)
                    .await;
                Err(Error::ParseError(e))
            }
            Err(e) => Err(Error::ParseError(e)),
        }
    }

    /// Log the registered handlers.
    fn display_routes(&self) {
        info!("Registered handlers:");
        for route in &self.routes {
            let method = route.method.as_ref().map_or("*", Method::as_str);
            let path = route.path.as_deref().unwrap_or("*");
            info!("  {method} {path}");
        }
    }

    /// Start the server and listen for incoming connections.
    ///
    /// Runs until Ctrl+C is received or a handler calls
    /// [`ServerContext::stop`].
    pub async fn start(&mut self) -> Result<(), Error> {
        let listener = TcpListener::bind(self.config.addr).await?;
        info!("Server listening on http://{addr}", addr = listener.local_addr()?);
        self.display_routes();

        let shutdown = signal::ctrl_c();
        tokio::pin!(shutdown);
        let mut watch_ctrl_c = true;

        while self.context.is_running() {
            tokio::select! {
                result = &mut shutdown, if watch_ctrl_c => {
                    match result {
                        Ok(()) => {
                            info!("Received Ctrl+C, shutting down");
                            break;
                        }
                        Err(e) => {
                            error!("Error setting up Ctrl+C handler: {e}");
                            watch_ctrl_c = false;
                        }
                    }
                }

                accept_result = listener.accept() => {
                    match accept_result {
                        Ok((socket, remote_addr)) => {
                            debug!("Accepted connection from {remote_addr}");
                            let local_addr = socket.local_addr().ok();
                            if let Err(e) = self.handle_connection(socket, local_addr, Some(remote_addr)).await {
                                error!("Error handling connection from {remote_addr}: {e}");
                            }
                        }
                        Err(e) => {
                            error!("Error accepting connection: {e}");
                            tokio::time::sleep(Duration::from_millis(100)).await;
                        }
                    }
                }
            }
        }

        info!("Server shutdown complete");
        Ok(())
    }
}
