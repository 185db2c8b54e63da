//! Dispatch conditioning: the pieces a router needs from a validated request.

use crate::request::{ProjectedParams, RequestEnvelope};
use crate::types::RequestId;

/// Route predicate: does the envelope's `method` equal `name`?
pub fn method_equals(envelope: &RequestEnvelope, name: &str) -> bool {
    envelope.method_equals(name)
}

/// A validated request in the shape handlers receive it.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodCall {
    pub method: String,
    pub id: Option<RequestId>,
    pub params: ProjectedParams,
}

impl MethodCall {
    pub fn from_envelope(envelope: &RequestEnvelope) -> Self {
        Self {
            method: envelope.method().unwrap_or_default().to_string(),
            id: envelope.id(),
            params: envelope.project_params(),
        }
    }

    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}
