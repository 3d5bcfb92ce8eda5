//! Method handlers and their parameter types.

use chess_analysis::{GameReviewer, ReviewConfig, ReviewFocus};
use chess_notation::{legal_moves, load_pgn, san_to_uci, uci_to_san};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::rpc::{Handler, RpcError, Service};

pub(crate) const ROUTES: [(&str, Handler); 10] = [
    ("engine.info", engine_info),
    ("engine.configure", engine_configure),
    ("position.evaluate", position_evaluate),
    ("moves.generate_legal", moves_generate_legal),
    ("moves.uci_to_san", moves_uci_to_san),
    ("moves.san_to_uci", moves_san_to_uci),
    ("pgn.load", pgn_load),
    ("pgn.review_overall", pgn_review_overall),
    ("pgn.review_white", pgn_review_white),
    ("pgn.review_black", pgn_review_black),
];

/// Missing params are treated as an empty object.
fn params<T: DeserializeOwned>(params: Value) -> Result<T, RpcError> {
    let params = match params {
        Value::Null => json!({}),
        other => other,
    };
    serde_json::from_value(params).map_err(|e| RpcError::InvalidParams(e.to_string()))
}

#[derive(Debug, Deserialize)]
struct ConfigureParams {
    threads: Option<u32>,
    hash_mb: Option<u32>,
    skill: Option<u32>,
    min_depth: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct EvaluateParams {
    fen: String,
    #[serde(default = "default_evaluate_depth")]
    depth: u32,
    #[serde(default = "default_multipv")]
    multipv: u32,
}

fn default_evaluate_depth() -> u32 {
    16
}

fn default_multipv() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
struct FenParams {
    fen: String,
}

#[derive(Debug, Deserialize)]
struct UciMovesParams {
    fen: String,
    uci_moves: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SanMovesParams {
    fen: String,
    san_moves: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct PgnParams {
    pgn: String,
}

#[derive(Debug, Deserialize)]
struct ReviewParams {
    pgn: String,
    /// Falls back to the service's review depth.
    depth: Option<u32>,
    blunder_threshold_cp: Option<i32>,
}

fn engine_info(service: &mut Service, _params: Value) -> Result<Value, RpcError> {
    let info = service.session.start()?;
    Ok(serde_json::to_value(info)?)
}

fn engine_configure(service: &mut Service, raw: Value) -> Result<Value, RpcError> {
    let p: ConfigureParams = params(raw)?;
    let mut config = service.session.config().clone();
    if let Some(threads) = p.threads {
        config.threads = threads;
    }
    if let Some(hash_mb) = p.hash_mb {
        config.hash_mb = hash_mb;
    }
    if let Some(skill) = p.skill {
        config.skill = skill;
    }
    if let Some(min_depth) = p.min_depth {
        config.min_depth = min_depth;
    }
    let info = service.session.reconfigure(config)?;
    Ok(serde_json::to_value(info)?)
}

fn position_evaluate(service: &mut Service, raw: Value) -> Result<Value, RpcError> {
    let p: EvaluateParams = params(raw)?;
    let result = service.session.evaluate(&p.fen, p.depth, p.multipv)?;
    Ok(serde_json::to_value(result)?)
}

fn moves_generate_legal(_service: &mut Service, raw: Value) -> Result<Value, RpcError> {
    let p: FenParams = params(raw)?;
    Ok(json!({ "legal_moves_uci": legal_moves(&p.fen)? }))
}

fn moves_uci_to_san(_service: &mut Service, raw: Value) -> Result<Value, RpcError> {
    let p: UciMovesParams = params(raw)?;
    Ok(json!(uci_to_san(&p.fen, &p.uci_moves)?))
}

fn moves_san_to_uci(_service: &mut Service, raw: Value) -> Result<Value, RpcError> {
    let p: SanMovesParams = params(raw)?;
    Ok(json!(san_to_uci(&p.fen, &p.san_moves)?))
}

fn pgn_load(_service: &mut Service, raw: Value) -> Result<Value, RpcError> {
    let p: PgnParams = params(raw)?;
    Ok(serde_json::to_value(load_pgn(&p.pgn)?)?)
}

fn pgn_review_overall(service: &mut Service, raw: Value) -> Result<Value, RpcError> {
    review(service, raw, ReviewFocus::Overall)
}

fn pgn_review_white(service: &mut Service, raw: Value) -> Result<Value, RpcError> {
    review(service, raw, ReviewFocus::White)
}

fn pgn_review_black(service: &mut Service, raw: Value) -> Result<Value, RpcError> {
    review(service, raw, ReviewFocus::Black)
}

fn review(service: &mut Service, raw: Value, focus: ReviewFocus) -> Result<Value, RpcError> {
    let p: ReviewParams = params(raw)?;
    let config = ReviewConfig {
        depth: p.depth.unwrap_or(service.review.depth),
        blunder_threshold_cp: p
            .blunder_threshold_cp
            .unwrap_or(service.review.blunder_threshold_cp),
    };

    let report = GameReviewer::new(&mut service.session, config).review_pgn(&p.pgn)?;
    let summary = service.summarizer.summarize(&report, focus);
    let key_moments: Vec<String> = report.moments.iter().map(|m| m.digest()).collect();

    Ok(json!({
        "summary": summary,
        "key_moments": key_moments,
        "side": focus,
        "report": report,
    }))
}
