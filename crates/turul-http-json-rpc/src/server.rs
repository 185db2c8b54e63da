//! HTTP JSON-RPC server
//!
//! Accept loop and configuration for serving a [`JsonRpcDispatcher`] over
//! HTTP/1.1. Each connection runs on its own tokio task.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tracing::{debug, error, info};

use turul_json_rpc_envelope::{JsonRpcDispatcher, JsonRpcHandler};

use crate::{HttpJsonRpcError, JsonRpcHttpHandler, Result};

/// Configuration for the HTTP JSON-RPC server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to
    pub bind_address: SocketAddr,
    /// Path of the JSON-RPC endpoint
    pub rpc_path: String,
    /// Maximum request body size in bytes
    pub max_body_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([127, 0, 0, 1], 8000)),
            rpc_path: "/".to_string(),
            max_body_size: 1024 * 1024, // 1MB
        }
    }
}

/// Builder for the HTTP JSON-RPC server
pub struct HttpJsonRpcServerBuilder {
    config: ServerConfig,
    dispatcher: JsonRpcDispatcher,
}

impl HttpJsonRpcServerBuilder {
    pub fn new() -> Self {
        Self {
            config: ServerConfig::default(),
            dispatcher: JsonRpcDispatcher::new(),
        }
    }

    /// Replace the whole configuration
    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the bind address
    pub fn bind_address(mut self, addr: SocketAddr) -> Self {
        self.config.bind_address = addr;
        self
    }

    /// Set the JSON-RPC endpoint path
    pub fn rpc_path(mut self, path: impl Into<String>) -> Self {
        self.config.rpc_path = path.into();
        self
    }

    /// Set maximum request body size
    pub fn max_body_size(mut self, size: usize) -> Self {
        self.config.max_body_size = size;
        self
    }

    /// Register a handler for a specific method
    pub fn register_method<H>(mut self, method: impl Into<String>, handler: H) -> Self
    where
        H: JsonRpcHandler + 'static,
    {
        self.dispatcher.register_method(method, handler);
        self
    }

    /// Register one handler for several methods
    pub fn register_methods<H>(mut self, methods: Vec<String>, handler: H) -> Self
    where
        H: JsonRpcHandler + 'static,
    {
        self.dispatcher.register_methods(methods, handler);
        self
    }

    /// Register a default handler for unmatched methods
    pub fn default_handler<H>(mut self, handler: H) -> Self
    where
        H: JsonRpcHandler + 'static,
    {
        self.dispatcher.set_default_handler(handler);
        self
    }

    pub fn build(self) -> HttpJsonRpcServer {
        let config = Arc::new(self.config);
        let handler = JsonRpcHttpHandler::new(Arc::clone(&config), Arc::new(self.dispatcher));
        HttpJsonRpcServer { config, handler }
    }
}

impl Default for HttpJsonRpcServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// HTTP JSON-RPC server
#[derive(Clone)]
pub struct HttpJsonRpcServer {
    config: Arc<ServerConfig>,
    handler: JsonRpcHttpHandler,
}

impl HttpJsonRpcServer {
    pub fn builder() -> HttpJsonRpcServerBuilder {
        HttpJsonRpcServerBuilder::new()
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// The request handler, for hosts that run their own accept loop.
    pub fn handler(&self) -> &JsonRpcHttpHandler {
        &self.handler
    }

    /// Bind the configured address and serve until an accept error.
    pub async fn run(&self) -> Result<()> {
        let addr = self.config.bind_address;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| HttpJsonRpcError::Bind { addr, source })?;
        self.serve(listener).await
    }

    /// Serve on an already-bound listener.
    pub async fn serve(&self, listener: TcpListener) -> Result<()> {
        info!("HTTP JSON-RPC server listening on {}", listener.local_addr()?);
        info!("JSON-RPC endpoint available at: {}", self.config.rpc_path);

        loop {
            let (stream, peer_addr) = listener.accept().await?;
            debug!("New connection from {}", peer_addr);

            let handler = self.handler.clone();
            tokio::spawn(async move {
                let io = TokioIo::new(stream);
                let service = service_fn(move |req| {
                    let handler = handler.clone();
                    async move { Ok::<_, Infallible>(handler.handle_request(req).await) }
                });

                if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                    // Clients hanging up mid-request is routine
                    if err.is_incomplete_message() {
                        debug!("Client disconnected: {}", err);
                    } else {
                        error!("Error serving connection: {}", err);
                    }
                }
            });
        }
    }
}
