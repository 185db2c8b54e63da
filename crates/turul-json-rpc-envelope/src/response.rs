use serde::Serialize;
use serde_json::Value;
use tracing::error;

use crate::error::{EnvelopeError, ResponseViolation};
use crate::request::RequestEnvelope;
use crate::taxonomy::ErrorCode;
use crate::types::{JsonRpcVersion, RequestId};

/// The `error` member of a response.
///
/// Fields stay optional so a half-built error is representable and caught by
/// [`ResponseEnvelope::validate`] instead of being serialized.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorObject {
    code: Option<i64>,
    message: Option<String>,
    data: Option<Value>,
}

impl ErrorObject {
    pub fn code(&self) -> Option<i64> {
        self.code
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    pub fn set_code(&mut self, code: i64) -> &mut Self {
        self.code = Some(code);
        self
    }

    pub fn set_message(&mut self, message: impl Into<String>) -> &mut Self {
        self.message = Some(message.into());
        self
    }

    pub fn set_data(&mut self, data: Value) -> &mut Self {
        self.data = Some(data);
        self
    }

    fn check(&self) -> Result<(), ResponseViolation> {
        let (Some(code), Some(message)) = (self.code, self.message.as_deref()) else {
            return Err(ResponseViolation::IncompleteError);
        };
        if message.is_empty() {
            return Err(ResponseViolation::IncompleteError);
        }
        if ErrorCode::from_code(code).is_none() {
            return Err(ResponseViolation::UnreservedErrorCode(code));
        }
        Ok(())
    }
}

/// Wire form; field order is the serialized key order.
#[derive(Serialize)]
struct WireResponse<'a> {
    jsonrpc: JsonRpcVersion,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<&'a Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<WireError<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a RequestId>,
}

#[derive(Serialize)]
struct WireError<'a> {
    code: i64,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a Value>,
}

/// An outbound JSON-RPC response under construction.
///
/// Mutation is lenient; [`validate`](Self::validate) and
/// [`serialize`](Self::serialize) are strict.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseEnvelope {
    id: Option<RequestId>,
    result: Option<Value>,
    error: Option<ErrorObject>,
}

impl ResponseEnvelope {
    pub fn new(id: Option<RequestId>) -> Self {
        Self {
            id,
            result: None,
            error: None,
        }
    }

    /// Response carrying whatever id the request had.
    pub fn for_request(request: &RequestEnvelope) -> Self {
        Self::new(request.id())
    }

    /// Ready-made error response.
    pub fn error_response(id: Option<RequestId>, code: ErrorCode, data: Option<Value>) -> Self {
        let mut response = Self::new(id);
        response.set_error_code(code, data);
        response
    }

    pub fn id(&self) -> Option<&RequestId> {
        self.id.as_ref()
    }

    pub fn set_id(&mut self, id: Option<RequestId>) {
        self.id = id;
    }

    pub fn result(&self) -> Option<&Value> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&ErrorObject> {
        self.error.as_ref()
    }

    /// Mutable error object, created empty if missing.
    pub fn error_mut(&mut self) -> &mut ErrorObject {
        self.error.get_or_insert_with(ErrorObject::default)
    }

    /// Sets `result`. An explicit `null` still counts as set.
    pub fn set_result(&mut self, value: Value) {
        self.result = Some(value);
    }

    /// Sets `error` from a reserved code, deriving the message.
    ///
    /// Unknown codes fail without touching the current error state.
    pub fn set_error(&mut self, code: i64, data: Option<Value>) -> Result<(), EnvelopeError> {
        let code = ErrorCode::try_from(code)?;
        self.set_error_code(code, data);
        Ok(())
    }

    pub fn set_error_code(&mut self, code: ErrorCode, data: Option<Value>) {
        let error = self.error_mut();
        error.set_code(code.code()).set_message(code.message());
        if let Some(data) = data {
            error.set_data(data);
        }
    }

    pub fn set_error_data(&mut self, data: Value) {
        self.error_mut().set_data(data);
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn validate(&self) -> Result<(), EnvelopeError> {
        self.check().map_err(EnvelopeError::from)
    }

    fn check(&self) -> Result<(), ResponseViolation> {
        match (&self.result, &self.error) {
            (None, None) => Err(ResponseViolation::MissingOutcome),
            (Some(_), Some(_)) => Err(ResponseViolation::ConflictingOutcome),
            (Some(_), None) if self.id.is_none() => Err(ResponseViolation::ResultWithoutId),
            (Some(_), None) => Ok(()),
            (None, Some(error)) => error.check(),
        }
    }

    /// Validate, then emit `jsonrpc`, `result` or `error`, and `id` in that
    /// order, omitting absent members.
    pub fn serialize(&self) -> Result<Vec<u8>, EnvelopeError> {
        if let Err(violation) = self.check() {
            error!("Refusing to serialize JSON-RPC response: {}", violation);
            return Err(violation.into());
        }
        let wire = WireResponse {
            jsonrpc: JsonRpcVersion::V2_0,
            result: self.result.as_ref(),
            error: self.error.as_ref().and_then(|error| {
                Some(WireError {
                    code: error.code?,
                    message: error.message.as_deref()?,
                    data: error.data.as_ref(),
                })
            }),
            id: self.id.as_ref(),
        };
        serde_json::to_vec(&wire)
            .map_err(|err| ResponseViolation::Encoding(err.to_string()).into())
    }

    pub fn to_json_string(&self) -> Result<String, EnvelopeError> {
        self.serialize()
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
    }
}
