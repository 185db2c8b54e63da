//! Builders for the HTTP responses the handler sends.

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{Response, StatusCode};
use http_body_util::Full;
use serde_json::Value;
use tracing::error;

use turul_json_rpc_envelope::{ErrorCode, RequestId, ResponseEnvelope};

use crate::protocol::{JSON_MEDIA_TYPE, status_for};

/// Last-resort body when an error envelope itself cannot be encoded.
const INTERNAL_ERROR_BODY: &str =
    r#"{"jsonrpc":"2.0","error":{"code":-32603,"message":"Internal error"}}"#;

fn json_response(status: StatusCode, body: impl Into<Bytes>) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, JSON_MEDIA_TYPE)
        .body(Full::new(body.into()))
        .unwrap()
}

/// 204 with an empty body, the answer to a successful notification.
pub fn no_content() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NO_CONTENT)
        .body(Full::new(Bytes::new()))
        .unwrap()
}

/// Error envelope with the status `status_for` assigns to `code`.
pub fn error_response(
    id: Option<RequestId>,
    code: ErrorCode,
    data: Option<Value>,
) -> Response<Full<Bytes>> {
    error_response_with_status(status_for(code), id, code, data)
}

pub fn error_response_with_status(
    status: StatusCode,
    id: Option<RequestId>,
    code: ErrorCode,
    data: Option<Value>,
) -> Response<Full<Bytes>> {
    match ResponseEnvelope::error_response(id, code, data).serialize() {
        Ok(body) => json_response(status, body),
        Err(err) => {
            error!("Failed to encode error response: {}", err);
            json_response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_BODY)
        }
    }
}

/// 200 with a result envelope. A response that fails validation is
/// reported as an internal error instead.
pub fn success_response(id: RequestId, result: Value) -> Response<Full<Bytes>> {
    let mut envelope = ResponseEnvelope::new(Some(id));
    envelope.set_result(result);
    match envelope.serialize() {
        Ok(body) => json_response(StatusCode::OK, body),
        Err(err) => {
            error!("Handler produced an invalid response: {}", err);
            error_response(envelope.id().cloned(), ErrorCode::InternalError, None)
        }
    }
}
