//! Review prose, from a language model when one is configured.
//!
//! [`Summarizer::summarize`] never fails. Any generator problem is logged and
//! replaced by [`fallback_summary`].

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::LlmConfig;
use crate::llm::ChatCompletionClient;
use crate::report::ReviewReport;

/// Fallback summaries list at most this many moments.
pub const FALLBACK_MOMENT_LINES: usize = 10;

const SYSTEM_PROMPT: &str = "You are a precise chess analyst. Use the provided engine-grounded data \
to write a concise, accurate review. Do not hallucinate board states. Focus on key mistakes \
(centipawn loss) and actionable lessons.";

/// Whose play a review concentrates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewFocus {
    Overall,
    White,
    Black,
}

impl fmt::Display for ReviewFocus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReviewFocus::Overall => write!(f, "overall"),
            ReviewFocus::White => write!(f, "white"),
            ReviewFocus::Black => write!(f, "black"),
        }
    }
}

#[derive(Error, Debug)]
pub enum SummaryError {
    #[error("Text generation is not configured")]
    NotConfigured,
    #[error("Text generation request failed: {0}")]
    Request(String),
    #[error("Unexpected text generation response: {0}")]
    BadResponse(String),
}

/// A chat-style text generation backend.
pub trait TextGenerator {
    fn generate(&self, system: &str, user: &str) -> Result<String, SummaryError>;
}

pub struct Summarizer {
    generator: Option<Box<dyn TextGenerator>>,
}

impl Summarizer {
    pub fn new(generator: Option<Box<dyn TextGenerator>>) -> Self {
        Self { generator }
    }

    /// Summarizer that only produces [`fallback_summary`] text.
    pub fn offline() -> Self {
        Self::new(None)
    }

    pub fn from_config(config: &LlmConfig) -> Self {
        match ChatCompletionClient::new(config) {
            Ok(client) => {
                info!(model = %config.model, "Review summaries use a language model");
                Self::new(Some(Box::new(client)))
            }
            Err(SummaryError::NotConfigured) => {
                info!("No LLM API key, review summaries are generated offline");
                Self::offline()
            }
            Err(e) => {
                warn!(error = %e, "LLM client unavailable, review summaries are generated offline");
                Self::offline()
            }
        }
    }

    pub fn summarize(&self, report: &ReviewReport, focus: ReviewFocus) -> String {
        let Some(generator) = &self.generator else {
            return fallback_summary(report, focus);
        };

        match generator.generate(SYSTEM_PROMPT, &user_prompt(report, focus)) {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "Summary generation failed, using fallback");
                fallback_summary(report, focus)
            }
        }
    }
}

fn user_prompt(report: &ReviewReport, focus: ReviewFocus) -> String {
    let document = json!({
        "side": focus,
        "initial_fen": report.initial_fen,
        "moves": report.moves.iter().map(|m| m.uci.as_str()).collect::<Vec<_>>(),
        "moments": report.moments,
    });
    format!(
        "Review the game from the following JSON. Focus on side={}. Provide a narrative and \
         bullet key takeaways.\nJSON:\n{}",
        focus, document
    )
}

/// Plain text summary built from the report alone.
pub fn fallback_summary(report: &ReviewReport, focus: ReviewFocus) -> String {
    let mut lines = vec![format!(
        "Review ({}): {} key moments detected.",
        focus,
        report.moments.len()
    )];
    lines.extend(
        report
            .moments
            .iter()
            .take(FALLBACK_MOMENT_LINES)
            .map(|m| format!("Ply {} ({}): move {} loss {} cp", m.ply, m.side, m.mv.uci, m.loss_cp)),
    );
    lines.join("\n")
}
