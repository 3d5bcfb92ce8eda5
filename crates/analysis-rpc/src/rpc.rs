//! Line-delimited JSON request loop.
//!
//! One request per input line, one response per output line, handled strictly
//! in order. A bad request only ever fails itself.

use std::collections::HashMap;
use std::io::{self, BufRead, Write};
use std::sync::OnceLock;

use chess_analysis::{EngineError, EngineSession, ReviewConfig, ReviewError, Summarizer};
use chess_notation::NotationError;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::ServiceConfig;
use crate::handlers;

/// Errors reported back to the caller of a single request.
#[derive(Error, Debug)]
pub enum RpcError {
    /// The line is not a well-formed request object.
    #[error("Invalid request: {0}")]
    Protocol(String),
    #[error("Unknown method: {0}")]
    UnknownMethod(String),
    #[error("Invalid params: {0}")]
    InvalidParams(String),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Notation(#[from] NotationError),
    #[error(transparent)]
    Review(#[from] ReviewError),
    #[error("Failed to encode result: {0}")]
    Encode(#[from] serde_json::Error),
}

/// One output line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub id: Value,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            id,
            ok: true,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: Value, error: &RpcError) -> Self {
        Self {
            id,
            ok: false,
            result: None,
            error: Some(error.to_string()),
        }
    }
}

pub(crate) type Handler = fn(&mut Service, Value) -> Result<Value, RpcError>;

fn routes() -> &'static HashMap<&'static str, Handler> {
    static ROUTES: OnceLock<HashMap<&'static str, Handler>> = OnceLock::new();
    ROUTES.get_or_init(|| handlers::ROUTES.iter().copied().collect())
}

/// Names of every method the service answers.
pub fn methods() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = routes().keys().copied().collect();
    names.sort_unstable();
    names
}

/// The engine session and collaborators shared by all requests.
pub struct Service {
    pub(crate) session: EngineSession,
    pub(crate) summarizer: Summarizer,
    pub(crate) review: ReviewConfig,
}

impl Service {
    pub fn new(config: ServiceConfig) -> Self {
        let summarizer = Summarizer::from_config(&config.llm);
        Self::with_parts(EngineSession::new(config.engine), summarizer, config.review)
    }

    pub fn with_parts(session: EngineSession, summarizer: Summarizer, review: ReviewConfig) -> Self {
        Self {
            session,
            summarizer,
            review,
        }
    }

    pub fn session(&self) -> &EngineSession {
        &self.session
    }

    /// Run one method.
    pub fn call(&mut self, method: &str, params: Value) -> Result<Value, RpcError> {
        let handler = routes()
            .get(method)
            .ok_or_else(|| RpcError::UnknownMethod(method.to_string()))?;
        handler(self, params)
    }

    /// Turn one input line into its response.
    pub fn handle_line(&mut self, line: &str) -> Response {
        let (id, method, params) = match parse_request(line) {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "Rejected request");
                return Response::failure(Value::Null, &e);
            }
        };

        debug!(%id, method = %method, "Handling request");
        match self.call(&method, params) {
            Ok(result) => Response::success(id, result),
            Err(e) => {
                warn!(%id, method = %method, error = %e, "Request failed");
                Response::failure(id, &e)
            }
        }
    }

    /// Stop the engine. Also happens on drop.
    pub fn shutdown(&mut self) {
        self.session.stop();
    }
}

fn parse_request(line: &str) -> Result<(Value, String, Value), RpcError> {
    let value: Value =
        serde_json::from_str(line).map_err(|e| RpcError::Protocol(e.to_string()))?;
    let Value::Object(mut request) = value else {
        return Err(RpcError::Protocol("request must be a JSON object".to_string()));
    };

    let id = request.remove("id").unwrap_or(Value::Null);
    let method = match request.remove("method") {
        Some(Value::String(method)) => method,
        _ => return Err(RpcError::Protocol("missing string field 'method'".to_string())),
    };
    let params = request.remove("params").unwrap_or(Value::Null);
    Ok((id, method, params))
}

/// Answer requests from `input` until it ends.
pub fn serve<R: BufRead, W: Write>(service: &mut Service, mut input: R, mut output: W) -> io::Result<()> {
    info!("Serving requests");
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if input.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let response = match std::str::from_utf8(&buf) {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => service.handle_line(line),
            Err(e) => {
                let e = RpcError::Protocol(format!("request is not valid UTF-8: {}", e));
                warn!(error = %e, "Rejected request");
                Response::failure(Value::Null, &e)
            }
        };
        serde_json::to_writer(&mut output, &response)?;
        writeln!(output)?;
        output.flush()?;
    }
    info!("Input closed, shutting down");
    service.shutdown();
    Ok(())
}
