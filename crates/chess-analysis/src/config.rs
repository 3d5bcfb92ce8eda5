//! Engine, review and text-generation settings.
//!
//! Every struct deserializes with defaults for missing fields so a partial
//! TOML table is enough. [`apply_env`](EngineConfig::apply_env) overlays
//! environment variables on top.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// How to launch and configure the analysis engine.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Engine executable, looked up in `PATH` when not absolute.
    pub path: String,
    /// Extra command line arguments for the engine.
    pub args: Vec<String>,
    /// `Threads` option.
    pub threads: u32,
    /// `Hash` option, in MB.
    pub hash_mb: u32,
    /// Searches never run shallower than this.
    pub min_depth: u32,
    /// `Skill Level` option.
    pub skill: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            path: "stockfish".to_string(),
            args: Vec::new(),
            threads: 1,
            hash_mb: 128,
            min_depth: 12,
            skill: 20,
        }
    }
}

impl EngineConfig {
    /// UCI options applied after the handshake, names passed verbatim.
    pub fn uci_options(&self) -> [(&'static str, u32); 3] {
        [
            ("Threads", self.threads),
            ("Hash", self.hash_mb),
            ("Skill Level", self.skill),
        ]
    }

    /// Depth a search actually runs with.
    pub fn effective_depth(&self, requested: u32) -> u32 {
        requested.max(self.min_depth)
    }

    /// Overlay `STOCKFISH_PATH` and `ANALYSIS_*` variables.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("STOCKFISH_PATH").filter(|p| !p.is_empty()) {
            self.path = path;
        }
        override_parsed(&lookup, "ANALYSIS_THREADS", &mut self.threads);
        override_parsed(&lookup, "ANALYSIS_HASH_MB", &mut self.hash_mb);
        override_parsed(&lookup, "ANALYSIS_MIN_DEPTH", &mut self.min_depth);
        override_parsed(&lookup, "ANALYSIS_SKILL", &mut self.skill);
    }
}

/// Game review settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ReviewConfig {
    /// Search depth for every before/after evaluation.
    pub depth: u32,
    /// Minimum absolute centipawn loss that makes a key moment.
    pub blunder_threshold_cp: i32,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            depth: 12,
            blunder_threshold_cp: 150,
        }
    }
}

impl ReviewConfig {
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        override_parsed(&lookup, "ANALYSIS_REVIEW_DEPTH", &mut self.depth);
        override_parsed(&lookup, "ANALYSIS_BLUNDER_CP", &mut self.blunder_threshold_cp);
    }
}

/// OpenAI-compatible chat completions endpoint used for review prose.
#[derive(Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LlmConfig {
    pub api_url: String,
    /// Without a key the summarizer always uses its offline text.
    pub api_key: Option<String>,
    pub model: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.openai.com/v1/chat/completions".to_string(),
            api_key: None,
            model: "gpt-4o-mini".to_string(),
        }
    }
}

// Hand-written so the key never ends up in logs.
impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .finish()
    }
}

impl LlmConfig {
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("LLM_API_URL").filter(|v| !v.is_empty()) {
            self.api_url = url;
        }
        if let Some(key) = lookup("LLM_API_KEY").filter(|v| !v.is_empty()) {
            self.api_key = Some(key);
        }
        if let Some(model) = lookup("LLM_MODEL").filter(|v| !v.is_empty()) {
            self.model = model;
        }
    }
}

fn override_parsed<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &str,
    target: &mut T,
) {
    if let Some(raw) = lookup(var) {
        match raw.trim().parse() {
            Ok(value) => *target = value,
            Err(_) => warn!(var, value = %raw, "Ignoring unparseable environment override"),
        }
    }
}
