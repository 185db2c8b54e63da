use thiserror::Error;

use crate::taxonomy::ErrorCode;

/// Failures raised while parsing, validating or building envelopes.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    /// Body is not syntactically valid JSON, or not a JSON object.
    #[error("Parse error: {0}")]
    Parse(String),

    /// JSON parsed but the request breaks the closed-record or field rules.
    #[error("Invalid request: {0}")]
    RequestStructure(#[from] RequestViolation),

    #[error("Method not found: {0}")]
    MethodNotFound(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    /// The response violates result/error exclusivity or id pairing.
    /// Always a handler defect, never a client fault.
    #[error("Invalid response: {0}")]
    ResponseStructure(#[from] ResponseViolation),

    /// A code outside the reserved taxonomy was supplied. Programmer error.
    #[error("Unknown JSON-RPC error code: {0}")]
    UnknownErrorCode(i64),
}

impl EnvelopeError {
    /// Wire code for this failure. `UnknownErrorCode` has none.
    pub fn error_code(&self) -> Option<ErrorCode> {
        match self {
            EnvelopeError::Parse(_) => Some(ErrorCode::ParseError),
            EnvelopeError::RequestStructure(_) => Some(ErrorCode::InvalidRequest),
            EnvelopeError::MethodNotFound(_) => Some(ErrorCode::MethodNotFound),
            EnvelopeError::InvalidParams(_) => Some(ErrorCode::InvalidParams),
            EnvelopeError::ResponseStructure(_) => Some(ErrorCode::InternalError),
            EnvelopeError::UnknownErrorCode(_) => None,
        }
    }
}

impl From<serde_json::Error> for EnvelopeError {
    fn from(err: serde_json::Error) -> Self {
        EnvelopeError::Parse(err.to_string())
    }
}

/// The first structural rule a request envelope broke.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestViolation {
    #[error("unexpected member '{0}'")]
    UnknownField(String),

    #[error("missing 'jsonrpc' member")]
    MissingVersion,

    #[error("unsupported protocol version {0}")]
    UnsupportedVersion(String),

    #[error("missing 'method' member")]
    MissingMethod,

    #[error("'method' must be a string, got {0}")]
    MethodNotString(&'static str),

    #[error("'method' must not be blank")]
    EmptyMethod,

    #[error("'id' must be a number or string, got {0}")]
    InvalidIdType(&'static str),

    #[error("'params' must be an array or object, got {0}")]
    InvalidParamsType(&'static str),
}

/// The first invariant a response envelope broke.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResponseViolation {
    #[error("neither 'result' nor 'error' is set")]
    MissingOutcome,

    #[error("both 'result' and 'error' are set")]
    ConflictingOutcome,

    #[error("'result' requires an 'id'")]
    ResultWithoutId,

    #[error("'error' requires both 'code' and 'message'")]
    IncompleteError,

    #[error("error code {0} is not a reserved code")]
    UnreservedErrorCode(i64),

    #[error("failed to encode response: {0}")]
    Encoding(String),
}
