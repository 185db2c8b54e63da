//! End-to-end tests over a real TCP connection

use std::net::SocketAddr;

use bytes::Bytes;
use futures::FutureExt;
use http::header::CONTENT_TYPE;
use http::{Method, Request, StatusCode};
use http_body_util::{BodyExt, Full};
use hyper::client::conn::http1;
use hyper_util::rt::TokioIo;
use serde_json::{Value, json};
use tokio::net::{TcpListener, TcpStream};

use turul_json_rpc_envelope::FunctionHandler;

use crate::{HandlerError, HttpJsonRpcServer, HttpJsonRpcServerBuilder, MethodCall};

async fn start(builder: HttpJsonRpcServerBuilder) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = builder.build();
    tokio::spawn(async move { server.serve(listener).await });
    addr
}

async fn send(addr: SocketAddr, path: &str, body: &str) -> (StatusCode, String) {
    let stream = TcpStream::connect(addr).await.unwrap();
    let (mut sender, conn) = http1::handshake(TokioIo::new(stream)).await.unwrap();
    tokio::spawn(conn);

    let req = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header(http::header::HOST, addr.to_string())
        .header(CONTENT_TYPE, "application/json")
        .body(Full::new(Bytes::copy_from_slice(body.as_bytes())))
        .unwrap();

    let response = sender.send_request(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn calculator() -> HttpJsonRpcServerBuilder {
    HttpJsonRpcServer::builder()
        .rpc_path("/rpc")
        .register_method(
            "add",
            FunctionHandler::new(|call: MethodCall| {
                async move {
                    let a: i64 = call.params.require("a")?;
                    let b: i64 = call.params.require("b")?;
                    Ok::<_, HandlerError>(json!(a + b))
                }
                .boxed()
            }),
        )
}

#[tokio::test]
async fn test_round_trip_over_tcp() {
    let addr = start(calculator()).await;

    let (status, body) = send(
        addr,
        "/rpc",
        r#"{"jsonrpc":"2.0","method":"add","params":{"a":2,"b":3},"id":1}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"jsonrpc":"2.0","result":5,"id":1}"#);
}

#[tokio::test]
async fn test_notification_over_tcp() {
    let addr = start(calculator()).await;

    let (status, body) = send(
        addr,
        "/rpc",
        r#"{"jsonrpc":"2.0","method":"add","params":{"a":2,"b":3}}"#,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_errors_over_tcp() {
    let addr = start(calculator()).await;

    let (status, body) = send(addr, "/rpc", r#"{"jsonrpc":"2.0","method":"add","id":"q"}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let response: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(response["error"]["code"], -32602);
    assert_eq!(response["id"], "q");

    let (status, body) = send(addr, "/", r#"{"jsonrpc":"2.0","method":"add","id":1}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let response: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(response["error"]["code"], -32601);
}

#[tokio::test]
async fn test_run_reports_bind_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = HttpJsonRpcServer::builder().bind_address(addr).build();
    let err = server.run().await.unwrap_err();
    assert!(matches!(err, crate::HttpJsonRpcError::Bind { addr: bound, .. } if bound == addr));
    drop(listener);
}
