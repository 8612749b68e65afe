//! HTTP server configuration object.

use std::net::SocketAddr;
use std::sync::Arc;

use user_service::domain::DEFAULT_LIST_LIMIT;
use user_service::domain::ports::UserRepository;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) repository: Arc<dyn UserRepository>,
    pub(crate) list_limit: usize,
}

impl ServerConfig {
    /// Construct a configuration serving `repository` on `bind_addr`.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, repository: Arc<dyn UserRepository>) -> Self {
        Self {
            bind_addr,
            repository,
            list_limit: DEFAULT_LIST_LIMIT,
        }
    }

    /// Override the listing cap applied by the user service.
    #[must_use]
    pub fn with_list_limit(mut self, list_limit: usize) -> Self {
        self.list_limit = list_limit;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
