//! HTTP request handlers and routing.

use log::info;

use crate::parser::{HttpRequest, Method};
use crate::server::context::ServerContext;
use crate::server::response::HttpResponse;

/// A request handler.
///
/// Returning `None` passes the request on to the next matching handler.
pub type HandlerFn = Box<dyn Fn(&HttpRequest, &mut ServerContext) -> Option<HttpResponse> + Send + Sync>;

/// How a route's path matched a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PathMatch<'a> {
    /// The route has no path and matches everything.
    Any,
    /// The path matched exactly.
    Exact,
    /// The path matched a trailing `*`; holds the wildcard part.
    Glob(&'a str),
}

/// Represents a route in the HTTP server.
pub struct Route {
    /// The method to match, or `None` for any method.
    pub method: Option<Method>,
    /// The path to match, or `None` for any path. A trailing `*` matches
    /// any suffix.
    pub path: Option<String>,
    /// The handler function.
    pub handler: HandlerFn,
}

impl Route {
    pub(crate) fn match_path<'a>(&self, path: &'a str) -> Option<PathMatch<'a>> {
        let Some(pattern) = &self.path else {
            return Some(PathMatch::Any);
        };
        match pattern.strip_suffix('*') {
            Some(prefix) => path.strip_prefix(prefix).map(PathMatch::Glob),
            None => (pattern == path).then_some(PathMatch::Exact),
        }
    }

    pub(crate) fn match_method(&self, method: &Method) -> bool {
        self.method.as_ref().map_or(true, |m| m == method)
    }
}

/// Count every request in [`ServerContext::request_count`].
pub fn count_requests(_request: &HttpRequest, context: &mut ServerContext) -> Option<HttpResponse> {
    context.request_count += 1;
    None
}

/// Log the client address, method and path of every request.
pub fn log_request(request: &HttpRequest, _context: &mut ServerContext) -> Option<HttpResponse> {
    let remote = request
        .remote_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "-".to_string());
    info!("{remote} - {method} {path}", method = request.method(), path = request.path());
    None
}

/// Redirect `/some/path/` to `/some/path`.
///
/// The target is built from the path as sent by the client, still
/// percent-encoded; the query string is dropped.
pub fn remove_trailing_slash(request: &HttpRequest, _context: &mut ServerContext) -> Option<HttpResponse> {
    let raw_path = request
        .path_and_query()
        .split_once('?')
        .map_or(request.path_and_query(), |(path, _)| path);
    let trimmed = raw_path.strip_suffix('/').filter(|trimmed| !trimmed.is_empty())?;
    Some(HttpResponse::redirect(trimmed, None))
}
