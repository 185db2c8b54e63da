//! # HTTP JSON-RPC Server Prelude
//!
//! ```rust
//! use turul_http_json_rpc::prelude::*;
//! ```

// Core server types
pub use crate::handler::JsonRpcHttpHandler;
pub use crate::server::{HttpJsonRpcServer, HttpJsonRpcServerBuilder, ServerConfig};

// Foundational types
pub use turul_json_rpc_envelope::prelude::*;

// Error types
pub use crate::{HttpJsonRpcError, Result};
