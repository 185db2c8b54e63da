//! Test modules for turul-http-json-rpc crate
//!
//! Handler tests drive `JsonRpcHttpHandler` with in-memory requests; server
//! tests go through a real socket.

pub mod server_tests;
