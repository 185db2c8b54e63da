//! # Calculator JSON-RPC Server
//!
//! Serves `add`, `subtract`, `divide` and a `log` notification over HTTP.
//!
//! ```bash
//! curl -s -H 'Content-Type: application/json' \
//!   -d '{"jsonrpc":"2.0","method":"add","params":{"a":2,"b":3},"id":1}' \
//!   http://127.0.0.1:8000/
//! ```

use std::net::SocketAddr;

use anyhow::Result;
use async_trait::async_trait;
use clap::Parser;
use serde_json::{Value, json};
use tracing::info;
use turul_http_json_rpc::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "calculator-server")]
#[command(about = "JSON-RPC 2.0 calculator over HTTP")]
struct Args {
    /// Address to bind the server to
    #[arg(short, long, default_value = "127.0.0.1:8000")]
    bind: SocketAddr,

    /// Path of the JSON-RPC endpoint
    #[arg(long, default_value = "/")]
    path: String,

    /// Maximum request body size in bytes
    #[arg(long, default_value_t = 1024 * 1024)]
    max_body_size: usize,
}

/// Binary arithmetic over named `a`/`b` or positional `[a, b]` params.
struct ArithmeticHandler;

impl ArithmeticHandler {
    fn operands(call: &MethodCall) -> HandlerResult<(f64, f64)> {
        if call.params.positional().is_empty() {
            Ok((call.params.require("a")?, call.params.require("b")?))
        } else {
            Ok((call.params.require_at(0)?, call.params.require_at(1)?))
        }
    }
}

#[async_trait]
impl JsonRpcHandler for ArithmeticHandler {
    async fn handle(&self, call: MethodCall) -> HandlerResult<Value> {
        let (a, b) = Self::operands(&call)?;
        match call.method.as_str() {
            "add" => Ok(json!(a + b)),
            "subtract" => Ok(json!(a - b)),
            "divide" if b == 0.0 => Err(HandlerError::InvalidParams(
                "division by zero".to_string(),
            )),
            "divide" => Ok(json!(a / b)),
            _ => Err(HandlerError::rpc(ErrorCode::MethodNotFound, None)),
        }
    }
}

/// Notification sink: logs the message, returns nothing useful.
struct LogHandler;

#[async_trait]
impl JsonRpcHandler for LogHandler {
    async fn handle(&self, call: MethodCall) -> HandlerResult<Value> {
        let message: String = call.params.require("message")?;
        info!("client says: {}", message);
        Ok(Value::Null)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let server = HttpJsonRpcServer::builder()
        .bind_address(args.bind)
        .rpc_path(args.path)
        .max_body_size(args.max_body_size)
        .register_methods(
            vec!["add".to_string(), "subtract".to_string(), "divide".to_string()],
            ArithmeticHandler,
        )
        .register_method("log", LogHandler)
        .build();

    info!(
        "Calculator listening at http://{}{}",
        server.config().bind_address,
        server.config().rpc_path
    );
    info!("Methods: add, subtract, divide, log (notification)");

    server.run().await?;
    Ok(())
}
