//! HTTP-side protocol rules: content negotiation and status mapping.

use http::header::CONTENT_TYPE;
use http::{HeaderMap, StatusCode};
use turul_json_rpc_envelope::ErrorCode;

/// The only media type accepted for request bodies.
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// Media type of the request, without parameters such as `charset`.
pub fn extract_media_type(headers: &HeaderMap) -> Option<String> {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|media_type| media_type.trim().to_ascii_lowercase())
}

pub fn is_json_request(headers: &HeaderMap) -> bool {
    extract_media_type(headers).as_deref() == Some(JSON_MEDIA_TYPE)
}

/// HTTP status for an error response. Internal errors are the server's
/// fault; everything else is reported as a bad request.
pub fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        ErrorCode::ParseError
        | ErrorCode::InvalidRequest
        | ErrorCode::MethodNotFound
        | ErrorCode::InvalidParams => StatusCode::BAD_REQUEST,
    }
}
