//! # HTTP JSON-RPC Server
//!
//! Binds the `turul-json-rpc-envelope` engine to an HTTP/1.1 pipeline built on
//! hyper. The handler applies the HTTP side of the contract: content-type
//! checks, body limits, status mapping, and the no-content reply for
//! successful notifications.
//!
//! ## Status mapping
//! - `-32603` (internal error): 500
//! - every other reserved code: 400
//! - successful notification: 204 with no body

pub mod handler;
pub mod json_rpc_responses;
pub mod prelude;
pub mod protocol;
pub mod server;

#[cfg(test)]
mod tests;

use std::net::SocketAddr;

// Re-export main types
pub use handler::JsonRpcHttpHandler;
pub use protocol::{extract_media_type, is_json_request, status_for};
pub use server::{HttpJsonRpcServer, HttpJsonRpcServerBuilder, ServerConfig};

// Re-export foundational types
pub use turul_json_rpc_envelope::{
    HandlerError, HandlerResult, JsonRpcDispatcher, JsonRpcHandler, MethodCall,
};

/// Result type for HTTP JSON-RPC operations
pub type Result<T> = std::result::Result<T, HttpJsonRpcError>;

/// HTTP JSON-RPC server errors
#[derive(Debug, thiserror::Error)]
pub enum HttpJsonRpcError {
    #[error("failed to bind on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
