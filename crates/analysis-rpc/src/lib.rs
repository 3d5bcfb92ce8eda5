//! Chess analysis over newline-delimited JSON.
//!
//! Each input line is a request `{"id", "method", "params"}`; each output line
//! is `{"id", "ok": true, "result"}` or `{"id", "ok": false, "error"}`.
//! See [`rpc::methods`] for the available methods.

pub mod config;
mod handlers;
pub mod rpc;

pub use config::{ConfigError, ServiceConfig};
pub use rpc::{serve, Response, RpcError, Service};
