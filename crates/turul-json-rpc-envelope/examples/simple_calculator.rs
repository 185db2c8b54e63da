//! Simple Calculator JSON-RPC Example
//!
//! Runs a handful of raw request bodies through the envelope engine and a
//! dispatcher, printing the response each would produce.

use async_trait::async_trait;
use serde_json::{Value, json};
use turul_json_rpc_envelope::{
    HandlerResult, JsonRpcDispatcher, JsonRpcHandler, MethodCall, RequestEnvelope,
    ResponseEnvelope,
};

/// Calculator handler that implements basic arithmetic operations
struct CalculatorHandler;

#[async_trait]
impl JsonRpcHandler for CalculatorHandler {
    async fn handle(&self, call: MethodCall) -> HandlerResult<Value> {
        let a: f64 = call.params.require("a")?;
        let b: f64 = call.params.require("b")?;

        match call.method.as_str() {
            "add" => Ok(json!(a + b)),
            "subtract" => Ok(json!(a - b)),
            _ => unreachable!("only registered for add and subtract"),
        }
    }
}

async fn respond(dispatcher: &JsonRpcDispatcher, body: &str) -> Option<String> {
    let request = match RequestEnvelope::parse(body.as_bytes()) {
        Ok(request) => request,
        Err(err) => {
            let code = err.error_code()?;
            return ResponseEnvelope::error_response(None, code, None)
                .to_json_string()
                .ok();
        }
    };

    let mut response = ResponseEnvelope::for_request(&request);
    match dispatcher.dispatch(&request).await {
        Ok(_) if request.is_notification() => return None,
        Ok(result) => response.set_result(result),
        Err(err) => response.set_error_code(err.error_code()?, err.data()),
    }
    response.to_json_string().ok()
}

#[tokio::main]
async fn main() {
    let mut dispatcher = JsonRpcDispatcher::new();
    dispatcher.register_methods(
        vec!["add".to_string(), "subtract".to_string()],
        CalculatorHandler,
    );

    let bodies = [
        r#"{"jsonrpc":"2.0","method":"add","params":{"a":5,"b":3},"id":1}"#,
        r#"{"jsonrpc":"2.0","method":"subtract","params":{"a":10,"b":4},"id":"two"}"#,
        r#"{"jsonrpc":"2.0","method":"add","params":{"a":5}}"#,
        r#"{"jsonrpc":"2.0","method":"add","params":{"a":5,"b":3}}"#,
        r#"{"jsonrpc":"2.0","method":"multiply","params":{"a":2,"b":3},"id":3}"#,
        r#"{"jsonrpc":"2.0","method":"add","extra":true,"id":4}"#,
        r#"{"jsonrpc":"2.0","method":"#,
    ];

    for body in bodies {
        println!("--> {}", body);
        match respond(&dispatcher, body).await {
            Some(response) => println!("<-- {}", response),
            None => println!("<-- (no content)"),
        }
    }
}
