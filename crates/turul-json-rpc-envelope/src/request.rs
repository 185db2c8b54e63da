use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{EnvelopeError, RequestViolation};
use crate::types::{JsonRpcVersion, RequestId, type_name};

/// The only members a request envelope may carry.
pub const REQUEST_MEMBERS: [&str; 4] = ["jsonrpc", "method", "params", "id"];

/// Parameters for a JSON-RPC request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RequestParams {
    /// Positional parameters as an array
    Array(Vec<Value>),
    /// Named parameters as an object
    Object(Map<String, Value>),
}

impl RequestParams {
    /// Accepts arrays and objects only; every other shape is `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Array(items) => Some(RequestParams::Array(items.clone())),
            Value::Object(map) => Some(RequestParams::Object(map.clone())),
            _ => None,
        }
    }

    /// Get a parameter by name (object params only)
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            RequestParams::Object(map) => map.get(key),
            RequestParams::Array(_) => None,
        }
    }

    /// Get a parameter by index (array params only)
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        match self {
            RequestParams::Array(vec) => vec.get(index),
            RequestParams::Object(_) => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            RequestParams::Object(map) => map.is_empty(),
            RequestParams::Array(vec) => vec.is_empty(),
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            RequestParams::Object(map) => Value::Object(map.clone()),
            RequestParams::Array(arr) => Value::Array(arr.clone()),
        }
    }

    /// Project into a handler's calling convention: arrays become positional
    /// arguments, objects become named arguments.
    pub fn project(self) -> ProjectedParams {
        match self {
            RequestParams::Array(positional) => ProjectedParams {
                positional,
                named: Map::new(),
            },
            RequestParams::Object(named) => ProjectedParams {
                positional: Vec::new(),
                named,
            },
        }
    }
}

impl From<Map<String, Value>> for RequestParams {
    fn from(map: Map<String, Value>) -> Self {
        RequestParams::Object(map)
    }
}

impl From<Vec<Value>> for RequestParams {
    fn from(vec: Vec<Value>) -> Self {
        RequestParams::Array(vec)
    }
}

/// Request params in the shape handler code consumes them.
///
/// The coercion helpers fail with [`EnvelopeError::InvalidParams`], which
/// hosts answer with `-32602`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectedParams {
    positional: Vec<Value>,
    named: Map<String, Value>,
}

impl ProjectedParams {
    pub fn positional(&self) -> &[Value] {
        &self.positional
    }

    pub fn named(&self) -> &Map<String, Value> {
        &self.named
    }

    pub fn arg(&self, index: usize) -> Option<&Value> {
        self.positional.get(index)
    }

    pub fn named_arg(&self, key: &str) -> Option<&Value> {
        self.named.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.named.is_empty()
    }

    /// Named argument that must be present and coerce to `T`.
    pub fn require<T: DeserializeOwned>(&self, key: &str) -> Result<T, EnvelopeError> {
        match self.named_arg(key) {
            None | Some(Value::Null) => Err(EnvelopeError::InvalidParams(format!(
                "missing required parameter '{}'",
                key
            ))),
            Some(value) => coerce(value, key),
        }
    }

    /// Named argument that may be absent; present values must coerce to `T`.
    pub fn optional<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, EnvelopeError> {
        match self.named_arg(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => coerce(value, key).map(Some),
        }
    }

    /// Positional argument that must be present and coerce to `T`.
    pub fn require_at<T: DeserializeOwned>(&self, index: usize) -> Result<T, EnvelopeError> {
        match self.arg(index) {
            None => Err(EnvelopeError::InvalidParams(format!(
                "missing positional parameter {}",
                index
            ))),
            Some(value) => coerce(value, &index.to_string()),
        }
    }
}

fn coerce<T: DeserializeOwned>(value: &Value, name: &str) -> Result<T, EnvelopeError> {
    T::deserialize(value)
        .map_err(|err| EnvelopeError::InvalidParams(format!("parameter '{}': {}", name, err)))
}

type Check = fn(&RequestEnvelope) -> Result<(), RequestViolation>;

/// Validation order; the first violated rule wins.
const CHECKS: [Check; 4] = [check_version, check_method, check_id, check_params];

/// An inbound JSON-RPC request as read off the wire.
///
/// Members keep their raw JSON form until [`validate`](Self::validate) runs,
/// so a malformed field is reported rather than silently dropped. Explicit
/// `null` members are treated as absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestEnvelope {
    jsonrpc: Option<Value>,
    method: Option<Value>,
    params: Option<Value>,
    id: Option<Value>,
}

impl RequestEnvelope {
    /// Parse raw body bytes.
    ///
    /// Malformed JSON or a non-object top level is a parse error; an
    /// unexpected member is a structural error.
    pub fn parse(raw: &[u8]) -> Result<Self, EnvelopeError> {
        let value: Value = serde_json::from_slice(raw)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, EnvelopeError> {
        let mut members = match value {
            Value::Object(members) => members,
            other => {
                return Err(EnvelopeError::Parse(format!(
                    "expected a JSON object, got {}",
                    type_name(&other)
                )));
            }
        };

        if let Some(unknown) = members
            .keys()
            .find(|key| !REQUEST_MEMBERS.contains(&key.as_str()))
        {
            return Err(RequestViolation::UnknownField(unknown.clone()).into());
        }

        let mut take = |name: &str| members.remove(name).filter(|v| !v.is_null());
        Ok(Self {
            jsonrpc: take("jsonrpc"),
            method: take("method"),
            params: take("params"),
            id: take("id"),
        })
    }

    /// Check the structural rules. Has no side effects, so repeated calls
    /// give the same outcome.
    pub fn validate(&self) -> Result<(), EnvelopeError> {
        CHECKS
            .iter()
            .try_for_each(|check| check(self))
            .map_err(|violation| {
                debug!("Rejected JSON-RPC request: {}", violation);
                violation.into()
            })
    }

    /// Raw `jsonrpc` member.
    pub fn version(&self) -> Option<&Value> {
        self.jsonrpc.as_ref()
    }

    /// The method name, when `method` is a string.
    pub fn method(&self) -> Option<&str> {
        self.method.as_ref().and_then(Value::as_str)
    }

    /// The request id when it is a number or a string.
    ///
    /// Also usable before or after a failed `validate()`, so error responses
    /// can echo whatever id was recoverable.
    pub fn id(&self) -> Option<RequestId> {
        self.id.as_ref().and_then(RequestId::from_value)
    }

    /// Typed params, `None` when absent or not an array/object.
    pub fn params(&self) -> Option<RequestParams> {
        self.params.as_ref().and_then(RequestParams::from_value)
    }

    /// A request without an id is a notification.
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }

    pub fn method_equals(&self, name: &str) -> bool {
        self.method() == Some(name)
    }

    /// Params in handler calling convention; empty when absent.
    pub fn project_params(&self) -> ProjectedParams {
        self.params()
            .map(RequestParams::project)
            .unwrap_or_default()
    }
}

fn check_version(envelope: &RequestEnvelope) -> Result<(), RequestViolation> {
    match &envelope.jsonrpc {
        None => Err(RequestViolation::MissingVersion),
        Some(version) if JsonRpcVersion::from_value(version).is_none() => {
            Err(RequestViolation::UnsupportedVersion(version.to_string()))
        }
        Some(_) => Ok(()),
    }
}

fn check_method(envelope: &RequestEnvelope) -> Result<(), RequestViolation> {
    match &envelope.method {
        None => Err(RequestViolation::MissingMethod),
        Some(Value::String(name)) if name.trim().is_empty() => Err(RequestViolation::EmptyMethod),
        Some(Value::String(_)) => Ok(()),
        Some(other) => Err(RequestViolation::MethodNotString(type_name(other))),
    }
}

fn check_id(envelope: &RequestEnvelope) -> Result<(), RequestViolation> {
    match &envelope.id {
        Some(id) if RequestId::from_value(id).is_none() => {
            Err(RequestViolation::InvalidIdType(type_name(id)))
        }
        _ => Ok(()),
    }
}

fn check_params(envelope: &RequestEnvelope) -> Result<(), RequestViolation> {
    match &envelope.params {
        Some(Value::Array(_)) | Some(Value::Object(_)) | None => Ok(()),
        Some(other) => Err(RequestViolation::InvalidParamsType(type_name(other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(value: Value) -> RequestEnvelope {
        RequestEnvelope::from_value(value).unwrap()
    }

    fn violation(value: Value) -> RequestViolation {
        match envelope(value).validate() {
            Err(EnvelopeError::RequestStructure(violation)) => violation,
            other => panic!("expected a structural error, got {:?}", other),
        }
    }

    fn valid() -> Value {
        json!({"jsonrpc": "2.0", "method": "foo", "params": [0, 1, 2], "id": 12345})
    }

    #[test]
    fn test_parse_reads_all_members() {
        let req = RequestEnvelope::parse(valid().to_string().as_bytes()).unwrap();

        assert_eq!(req.version(), Some(&json!("2.0")));
        assert_eq!(req.method(), Some("foo"));
        assert_eq!(
            req.params(),
            Some(RequestParams::Array(vec![json!(0), json!(1), json!(2)]))
        );
        assert_eq!(req.id(), Some(RequestId::from(12345)));
        assert!(!req.is_notification());
    }

    #[test]
    fn test_parse_empty_object_leaves_members_absent() {
        let req = RequestEnvelope::parse(b"{}").unwrap();

        assert_eq!(req.version(), None);
        assert_eq!(req.method(), None);
        assert_eq!(req.params(), None);
        assert_eq!(req.id(), None);
        assert!(req.is_notification());
    }

    #[test]
    fn test_parse_rejects_unknown_members() {
        let err = RequestEnvelope::parse(br#"{"foo": "bar"}"#).unwrap_err();
        assert!(matches!(
            err,
            EnvelopeError::RequestStructure(RequestViolation::UnknownField(ref key)) if key == "foo"
        ));
    }

    #[test]
    fn test_parse_errors() {
        for raw in [&b"''"[..], b"{\"jsonrpc\": ", b"", b"\xff\xfe"] {
            let err = RequestEnvelope::parse(raw).unwrap_err();
            assert!(matches!(err, EnvelopeError::Parse(_)), "input {:?}", raw);
        }
    }

    #[test]
    fn test_parse_rejects_non_object_top_level() {
        for raw in [&b"[1, 2]"[..], b"\"foo\"", b"42", b"null"] {
            let err = RequestEnvelope::parse(raw).unwrap_err();
            assert!(matches!(err, EnvelopeError::Parse(_)), "input {:?}", raw);
        }
    }

    #[test]
    fn test_valid_request() {
        assert!(envelope(valid()).validate().is_ok());
    }

    #[test]
    fn test_validate_is_idempotent() {
        let req = envelope(valid());
        let before = req.clone();
        assert!(req.validate().is_ok());
        assert!(req.validate().is_ok());
        assert_eq!(req, before);

        let bad = envelope(json!({"jsonrpc": "2.0"}));
        assert!(bad.validate().is_err());
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_requires_version() {
        let mut args = valid();
        args["jsonrpc"] = Value::Null;
        assert_eq!(violation(args), RequestViolation::MissingVersion);
    }

    #[test]
    fn test_requires_version_string_2_0() {
        let mut args = valid();
        args["jsonrpc"] = json!(1.9);
        assert_eq!(
            violation(args),
            RequestViolation::UnsupportedVersion("1.9".into())
        );

        let mut args = valid();
        args["jsonrpc"] = json!(2.0);
        assert!(matches!(violation(args), RequestViolation::UnsupportedVersion(_)));

        let mut args = valid();
        args["jsonrpc"] = json!("1.0");
        assert!(matches!(violation(args), RequestViolation::UnsupportedVersion(_)));
    }

    #[test]
    fn test_requires_method() {
        let mut args = valid();
        args["method"] = Value::Null;
        assert_eq!(violation(args), RequestViolation::MissingMethod);

        let mut args = valid();
        args["method"] = json!("");
        assert_eq!(violation(args), RequestViolation::EmptyMethod);

        let mut args = valid();
        args["method"] = json!("   ");
        assert_eq!(violation(args), RequestViolation::EmptyMethod);

        let mut args = valid();
        args["method"] = json!(5);
        assert_eq!(violation(args), RequestViolation::MethodNotString("number"));
    }

    #[test]
    fn test_allows_absent_params_and_id() {
        let args = json!({"jsonrpc": "2.0", "method": "foo", "params": null, "id": null});
        let req = envelope(args);
        assert!(req.validate().is_ok());
        assert!(req.is_notification());
    }

    #[test]
    fn test_allows_object_params() {
        let mut args = valid();
        args["params"] = json!({"foo": "bar"});
        assert!(envelope(args).validate().is_ok());
    }

    #[test]
    fn test_rejects_scalar_params() {
        let mut args = valid();
        args["params"] = json!("foo");
        assert_eq!(violation(args), RequestViolation::InvalidParamsType("string"));

        let mut args = valid();
        args["params"] = json!(true);
        assert_eq!(violation(args), RequestViolation::InvalidParamsType("boolean"));
    }

    #[test]
    fn test_allows_string_id() {
        let mut args = valid();
        args["id"] = json!("foo");
        let req = envelope(args);
        assert!(req.validate().is_ok());
        assert_eq!(req.id(), Some(RequestId::from("foo")));
    }

    #[test]
    fn test_rejects_other_id_types() {
        let mut args = valid();
        args["id"] = json!({});
        assert_eq!(violation(args), RequestViolation::InvalidIdType("object"));

        let mut args = valid();
        args["id"] = json!([1]);
        assert_eq!(violation(args), RequestViolation::InvalidIdType("array"));
    }

    #[test]
    fn test_first_violation_wins() {
        let args = json!({"jsonrpc": "1.0", "params": "foo", "id": {}});
        assert!(matches!(violation(args), RequestViolation::UnsupportedVersion(_)));

        let args = json!({"jsonrpc": "2.0", "params": "foo", "id": {}});
        assert_eq!(violation(args), RequestViolation::MissingMethod);

        let args = json!({"jsonrpc": "2.0", "method": "foo", "params": "foo", "id": {}});
        assert_eq!(violation(args), RequestViolation::InvalidIdType("object"));
    }

    #[test]
    fn test_id_is_recoverable_when_other_members_are_invalid() {
        let req = envelope(json!({"jsonrpc": "1.0", "method": "foo", "id": 7}));
        assert!(req.validate().is_err());
        assert_eq!(req.id(), Some(RequestId::from(7)));
    }

    #[test]
    fn test_method_equals() {
        let req = envelope(valid());
        assert!(req.method_equals("foo"));
        assert!(!req.method_equals("bar"));
        assert!(!envelope(json!({"method": 1})).method_equals("1"));
    }

    #[test]
    fn test_project_array_params() {
        let projected = envelope(valid()).project_params();

        assert_eq!(projected.positional(), &[json!(0), json!(1), json!(2)]);
        assert!(projected.named().is_empty());
        assert_eq!(projected.require_at::<i64>(2).unwrap(), 2);
        assert!(matches!(
            projected.require_at::<i64>(3),
            Err(EnvelopeError::InvalidParams(_))
        ));
    }

    #[test]
    fn test_project_object_params() {
        let mut args = valid();
        args["params"] = json!({"foo": "foo", "bar": 2});
        let projected = envelope(args).project_params();

        assert!(projected.positional().is_empty());
        assert_eq!(projected.named_arg("foo"), Some(&json!("foo")));
        assert_eq!(projected.require::<String>("foo").unwrap(), "foo");
        assert_eq!(projected.optional::<i64>("bar").unwrap(), Some(2));
        assert_eq!(projected.optional::<i64>("baz").unwrap(), None);
    }

    #[test]
    fn test_project_absent_params_is_empty() {
        let projected = envelope(json!({"jsonrpc": "2.0", "method": "bar"})).project_params();
        assert!(projected.is_empty());
        assert!(matches!(
            projected.require::<String>("baz"),
            Err(EnvelopeError::InvalidParams(_))
        ));
    }

    #[test]
    fn test_coercion_failure_is_invalid_params() {
        let projected = RequestParams::from_value(&json!({"baz": 42}))
            .unwrap()
            .project();
        let err = projected.require::<String>("baz").unwrap_err();
        assert!(err.to_string().contains("'baz'"));
        assert!(matches!(err, EnvelopeError::InvalidParams(_)));
    }
}
