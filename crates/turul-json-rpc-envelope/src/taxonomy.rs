//! Reserved JSON-RPC 2.0 error codes and their canonical messages.

use std::fmt;

use crate::error::EnvelopeError;

/// The fixed set of error codes a response may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ParseError,
    InvalidRequest,
    MethodNotFound,
    InvalidParams,
    InternalError,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 5] = [
        ErrorCode::ParseError,
        ErrorCode::InvalidRequest,
        ErrorCode::MethodNotFound,
        ErrorCode::InvalidParams,
        ErrorCode::InternalError,
    ];

    pub fn code(&self) -> i64 {
        match self {
            ErrorCode::ParseError => -32700,
            ErrorCode::InvalidRequest => -32600,
            ErrorCode::MethodNotFound => -32601,
            ErrorCode::InvalidParams => -32602,
            ErrorCode::InternalError => -32603,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ErrorCode::ParseError => "Parse error",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::MethodNotFound => "Method not found",
            ErrorCode::InvalidParams => "Invalid params",
            ErrorCode::InternalError => "Internal error",
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }
}

impl TryFrom<i64> for ErrorCode {
    type Error = EnvelopeError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or(EnvelopeError::UnknownErrorCode(code))
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

/// Message for a reserved code, `None` for anything outside the table.
pub fn lookup(code: i64) -> Option<&'static str> {
    ErrorCode::from_code(code).map(|c| c.message())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(ErrorCode::ParseError.code(), -32700);
        assert_eq!(ErrorCode::InvalidRequest.code(), -32600);
        assert_eq!(ErrorCode::MethodNotFound.code(), -32601);
        assert_eq!(ErrorCode::InvalidParams.code(), -32602);
        assert_eq!(ErrorCode::InternalError.code(), -32603);
    }

    #[test]
    fn test_lookup_table() {
        assert_eq!(lookup(-32700), Some("Parse error"));
        assert_eq!(lookup(-32600), Some("Invalid request"));
        assert_eq!(lookup(-32601), Some("Method not found"));
        assert_eq!(lookup(-32602), Some("Invalid params"));
        assert_eq!(lookup(-32603), Some("Internal error"));
        assert_eq!(lookup(-32000), None);
        assert_eq!(lookup(-1), None);
    }

    #[test]
    fn test_try_from_unknown_code() {
        let err = ErrorCode::try_from(-1).unwrap_err();
        assert!(matches!(err, EnvelopeError::UnknownErrorCode(-1)));
        assert_eq!(ErrorCode::try_from(-32601).unwrap(), ErrorCode::MethodNotFound);
    }

    #[test]
    fn test_display() {
        assert_eq!(ErrorCode::InternalError.to_string(), "-32603: Internal error");
    }
}
