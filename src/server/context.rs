//! State shared between the server and its handlers.

/// Server state handed to every handler.
#[derive(Debug, Clone)]
pub struct ServerContext {
    /// The value of the `Server` response header, if any.
    pub signature: Option<String>,
    /// Requests counted by [`count_requests`](crate::server::count_requests).
    pub request_count: u64,
    running: bool,
}

impl ServerContext {
    pub fn new(signature: Option<String>) -> Self {
        Self {
            signature,
            request_count: 0,
            running: true,
        }
    }

    /// Ask the server to stop once the current connection is finished.
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}
