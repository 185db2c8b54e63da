//! # JSON-RPC 2.0 Envelopes
//!
//! Transport-agnostic request validation and response construction for
//! JSON-RPC 2.0 servers. Hosts hand raw body bytes to [`RequestEnvelope`],
//! route on the validated method, and build a [`ResponseEnvelope`] that is
//! checked against the protocol's invariants before it is serialized.
//!
//! ## Features
//! - Closed-record request parsing (unknown members are rejected)
//! - Ordered, first-violation-wins request validation
//! - Result/error exclusivity enforced at serialization time
//! - Fixed taxonomy of reserved error codes
//! - Optional async method dispatcher with the `async` feature

pub mod dispatch;
pub mod error;
pub mod prelude;
pub mod request;
pub mod response;
pub mod taxonomy;
pub mod types;

#[cfg(feature = "async")]
pub mod r#async;

// Re-export main types
pub use dispatch::{MethodCall, method_equals};
pub use error::{EnvelopeError, RequestViolation, ResponseViolation};
pub use request::{ProjectedParams, RequestEnvelope, RequestParams};
pub use response::{ErrorObject, ResponseEnvelope};
pub use taxonomy::ErrorCode;
pub use types::{JsonRpcVersion, RequestId};

#[cfg(feature = "async")]
pub use r#async::{FunctionHandler, HandlerError, HandlerResult, JsonRpcDispatcher, JsonRpcHandler};

/// JSON-RPC 2.0 version constant
pub const JSONRPC_VERSION: &str = "2.0";

/// Standard JSON-RPC 2.0 error codes
pub mod error_codes {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;
}
