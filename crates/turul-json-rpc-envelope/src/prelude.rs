//! # JSON-RPC Envelope Prelude
//!
//! Convenient re-exports of the most commonly used types.
//!
//! ```rust
//! use turul_json_rpc_envelope::prelude::*;
//! ```

pub use crate::dispatch::{MethodCall, method_equals};
pub use crate::error::EnvelopeError;
pub use crate::request::{ProjectedParams, RequestEnvelope, RequestParams};
pub use crate::response::ResponseEnvelope;
pub use crate::taxonomy::ErrorCode;
pub use crate::types::RequestId;

#[cfg(feature = "async")]
pub use crate::r#async::{HandlerError, HandlerResult, JsonRpcDispatcher, JsonRpcHandler};

// Standard error codes
pub use crate::error_codes::*;
