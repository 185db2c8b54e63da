//! HTTP request handler binding the envelope engine to hyper.

use std::sync::Arc;

use bytes::Bytes;
use http::{Method, Request, Response};
use http_body::Body;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use tracing::{debug, error, warn};

use turul_json_rpc_envelope::{
    EnvelopeError, ErrorCode, HandlerError, JsonRpcDispatcher, RequestEnvelope, RequestId,
};

use crate::json_rpc_responses::{error_response, no_content, success_response};
use crate::protocol::is_json_request;
use crate::server::ServerConfig;

/// Why the request body could not be read.
enum BodyError {
    TooLarge,
    Read(String),
}

/// HTTP handler for JSON-RPC requests
#[derive(Clone)]
pub struct JsonRpcHttpHandler {
    config: Arc<ServerConfig>,
    dispatcher: Arc<JsonRpcDispatcher>,
}

impl JsonRpcHttpHandler {
    pub fn new(config: Arc<ServerConfig>, dispatcher: Arc<JsonRpcDispatcher>) -> Self {
        Self { config, dispatcher }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Handle one HTTP exchange. Never fails: every outcome, including
    /// transport-level rejections, is a JSON-RPC response or a 204.
    ///
    /// Every request body is parsed and validated before routing, so a
    /// request to an unknown path still gets its id echoed.
    pub async fn handle_request<B>(&self, req: Request<B>) -> Response<Full<Bytes>>
    where
        B: Body<Data = Bytes>,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let (parts, body) = req.into_parts();
        if !is_json_request(&parts.headers) {
            warn!(
                "Rejecting request with content type {:?}",
                parts.headers.get(http::header::CONTENT_TYPE)
            );
            return error_response(None, ErrorCode::ParseError, None);
        }

        let body = match self.read_body(body).await {
            Ok(body) => body,
            Err(BodyError::TooLarge) => {
                warn!(
                    "Request body exceeds limit of {} bytes",
                    self.config.max_body_size
                );
                return error_response(None, ErrorCode::InvalidRequest, None);
            }
            Err(BodyError::Read(err)) => {
                error!("Failed to read request body: {}", err);
                return error_response(None, ErrorCode::ParseError, None);
            }
        };

        let envelope = match RequestEnvelope::parse(&body) {
            Ok(envelope) => envelope,
            Err(err) => return self.envelope_error(None, err),
        };
        let id = envelope.id();
        if let Err(err) = envelope.validate() {
            return self.envelope_error(id, err);
        }

        if parts.method != Method::POST || parts.uri.path() != self.config.rpc_path {
            debug!("No route for {} {}", parts.method, parts.uri.path());
            return error_response(id, ErrorCode::MethodNotFound, None);
        }

        // A successful notification gets no body; errors are always reported.
        match (self.dispatcher.dispatch_validated(&envelope).await, id) {
            (Ok(_), None) => {
                debug!("Notification '{}' handled", envelope.method().unwrap_or_default());
                no_content()
            }
            (Ok(result), Some(id)) => success_response(id, result),
            (Err(err), id) => self.handler_error(id, err),
        }
    }

    async fn read_body<B>(&self, body: B) -> Result<Bytes, BodyError>
    where
        B: Body<Data = Bytes>,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Limited::new(body, self.config.max_body_size)
            .collect()
            .await
            .map(|collected| collected.to_bytes())
            .map_err(|err| {
                if err.downcast_ref::<LengthLimitError>().is_some() {
                    BodyError::TooLarge
                } else {
                    BodyError::Read(err.to_string())
                }
            })
    }

    fn envelope_error(&self, id: Option<RequestId>, err: EnvelopeError) -> Response<Full<Bytes>> {
        debug!("Rejecting JSON-RPC request: {}", err);
        match err.error_code() {
            Some(code) => error_response(id, code, None),
            None => {
                error!("No wire code for request error: {}", err);
                error_response(id, ErrorCode::InternalError, None)
            }
        }
    }

    fn handler_error(&self, id: Option<RequestId>, err: HandlerError) -> Response<Full<Bytes>> {
        match err.error_code() {
            Some(ErrorCode::InternalError) => {
                error!("Handler failed: {}", err);
                error_response(id, ErrorCode::InternalError, err.data())
            }
            Some(code) => {
                debug!("Handler reported {}: {}", code, err);
                error_response(id, code, err.data())
            }
            None => {
                error!("Handler reported an unreserved error code: {}", err);
                error_response(id, ErrorCode::InternalError, None)
            }
        }
    }
}
