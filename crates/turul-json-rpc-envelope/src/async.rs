use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::dispatch::{MethodCall, method_equals};
use crate::error::EnvelopeError;
use crate::request::RequestEnvelope;
use crate::taxonomy::ErrorCode;

/// Errors a handler may report back to the caller.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Parameter validation rejected the projected params.
    #[error("Invalid params: {0}")]
    InvalidParams(String),

    /// An explicitly chosen reserved error, optionally with context data.
    #[error("{code}")]
    Rpc { code: ErrorCode, data: Option<Value> },

    #[error(transparent)]
    Envelope(#[from] EnvelopeError),
}

impl HandlerError {
    pub fn rpc(code: ErrorCode, data: Option<Value>) -> Self {
        HandlerError::Rpc { code, data }
    }

    /// Wire code for this error. `None` means a programmer error
    /// (an unknown error code escaped a handler).
    pub fn error_code(&self) -> Option<ErrorCode> {
        match self {
            HandlerError::InvalidParams(_) => Some(ErrorCode::InvalidParams),
            HandlerError::Rpc { code, .. } => Some(*code),
            HandlerError::Envelope(err) => err.error_code(),
        }
    }

    /// Context data for the `error.data` member.
    pub fn data(&self) -> Option<Value> {
        match self {
            HandlerError::Rpc { data, .. } => data.clone(),
            _ => None,
        }
    }
}

pub type HandlerResult<T> = Result<T, HandlerError>;

/// Trait for handling JSON-RPC method calls
#[async_trait]
pub trait JsonRpcHandler: Send + Sync {
    async fn handle(&self, call: MethodCall) -> HandlerResult<Value>;
}

/// A simple function-based handler
pub struct FunctionHandler<F>
where
    F: Fn(MethodCall) -> futures::future::BoxFuture<'static, HandlerResult<Value>> + Send + Sync,
{
    handler_fn: F,
}

impl<F> FunctionHandler<F>
where
    F: Fn(MethodCall) -> futures::future::BoxFuture<'static, HandlerResult<Value>> + Send + Sync,
{
    pub fn new(handler_fn: F) -> Self {
        Self { handler_fn }
    }
}

#[async_trait]
impl<F> JsonRpcHandler for FunctionHandler<F>
where
    F: Fn(MethodCall) -> futures::future::BoxFuture<'static, HandlerResult<Value>> + Send + Sync,
{
    async fn handle(&self, call: MethodCall) -> HandlerResult<Value> {
        (self.handler_fn)(call).await
    }
}

/// Selects a handler by comparing the request's `method` with each
/// registered name, in registration order. Unmatched methods fall through to
/// the default handler, if any.
#[derive(Default)]
pub struct JsonRpcDispatcher {
    routes: Vec<(String, Arc<dyn JsonRpcHandler>)>,
    default_handler: Option<Arc<dyn JsonRpcHandler>>,
}

impl JsonRpcDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for a specific method
    pub fn register_method<H>(&mut self, method: impl Into<String>, handler: H)
    where
        H: JsonRpcHandler + 'static,
    {
        self.routes.push((method.into(), Arc::new(handler)));
    }

    /// Register a handler for multiple methods
    pub fn register_methods<H>(&mut self, methods: Vec<String>, handler: H)
    where
        H: JsonRpcHandler + 'static,
    {
        let handler: Arc<dyn JsonRpcHandler> = Arc::new(handler);
        for method in methods {
            self.routes.push((method, Arc::clone(&handler)));
        }
    }

    /// Set a default handler for unregistered methods
    pub fn set_default_handler<H>(&mut self, handler: H)
    where
        H: JsonRpcHandler + 'static,
    {
        self.default_handler = Some(Arc::new(handler));
    }

    /// The handler a request would be routed to.
    pub fn resolve(&self, envelope: &RequestEnvelope) -> Option<&Arc<dyn JsonRpcHandler>> {
        self.routes
            .iter()
            .find(|(name, _)| method_equals(envelope, name))
            .map(|(_, handler)| handler)
            .or(self.default_handler.as_ref())
    }

    /// Validate the envelope, route it, and run the handler.
    ///
    /// The caller decides what to send back: a success for a notification
    /// gets no body, while errors are always reported.
    pub async fn dispatch(&self, envelope: &RequestEnvelope) -> HandlerResult<Value> {
        envelope.validate()?;
        self.dispatch_validated(envelope).await
    }

    /// Route and run an envelope the caller has already validated.
    pub async fn dispatch_validated(&self, envelope: &RequestEnvelope) -> HandlerResult<Value> {
        let method = envelope.method().unwrap_or_default();
        let handler = self
            .resolve(envelope)
            .ok_or_else(|| EnvelopeError::MethodNotFound(method.to_string()))?;

        debug!("Dispatching JSON-RPC method '{}'", method);
        handler.handle(MethodCall::from_envelope(envelope)).await
    }

    /// Get all registered methods
    pub fn registered_methods(&self) -> Vec<String> {
        self.routes.iter().map(|(name, _)| name.clone()).collect()
    }
}
