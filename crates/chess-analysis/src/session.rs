//! Long-lived engine session.

use chess_notation::Board;
use serde::Serialize;
use tracing::{debug, info, warn};
use uci::GoOptions;

use crate::config::EngineConfig;
use crate::engine::{EngineError, EngineInfo, EngineProcess};
use crate::evaluation::{Score, Side};

/// Result of a single position evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvalResult {
    /// Score from the side to move's perspective.
    pub score: Score,
    /// First move of the principal variation.
    pub bestmove: Option<String>,
    /// Principal variation in UCI notation.
    pub pv: Vec<String>,
    /// Depth the caller asked for.
    pub depth: u32,
    /// Depth limit the search actually ran with, never below the configured minimum.
    pub search_depth: u32,
    pub engine: EngineInfo,
}

/// One engine process plus the configuration it was started with.
///
/// The process is started lazily by the first [`evaluate`](Self::evaluate)
/// or explicitly by [`start`](Self::start). After a failed search the session
/// refuses further work until [`stop`](Self::stop) is called.
pub struct EngineSession {
    config: EngineConfig,
    process: Option<EngineProcess>,
    info: EngineInfo,
    multipv: u32,
    poisoned: bool,
}

impl EngineSession {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            process: None,
            info: EngineInfo::default(),
            multipv: 1,
            poisoned: false,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.process.is_some()
    }

    /// Whether a search failed since the last [`stop`](Self::stop).
    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    /// Identity of the last started engine.
    pub fn info(&self) -> &EngineInfo {
        &self.info
    }

    /// Launch the engine and apply options. No-op when already running.
    pub fn start(&mut self) -> Result<EngineInfo, EngineError> {
        if self.process.is_some() {
            return Ok(self.info.clone());
        }

        info!(path = %self.config.path, "Starting engine");
        let mut process = EngineProcess::spawn(&self.config.path, &self.config.args)?;
        let mut engine_info = EngineInfo::from_id_name(process.id_name());

        for (name, value) in self.config.uci_options() {
            if !process.supports_option(name) {
                warn!(option = name, value, "Engine does not support option, skipping");
                continue;
            }
            match process.set_option(name, value) {
                Ok(()) => {
                    debug!(option = name, value, "Applied engine option");
                    engine_info.options.insert(name.to_string(), value);
                }
                Err(e) => warn!(option = name, value, error = %e, "Failed to set engine option"),
            }
        }

        process.sync().map_err(|e| EngineError::Start {
            path: self.config.path.clone(),
            reason: match e {
                EngineError::Evaluation(reason) => reason,
                other => other.to_string(),
            },
        })?;

        info!(name = %engine_info.name, version = %engine_info.version, "Engine ready");
        self.process = Some(process);
        self.info = engine_info;
        self.multipv = 1;
        self.poisoned = false;
        Ok(self.info.clone())
    }

    /// Shut the engine down. Safe to call at any time.
    pub fn stop(&mut self) {
        if let Some(mut process) = self.process.take() {
            info!("Stopping engine");
            process.shutdown();
        }
        self.poisoned = false;
        self.multipv = 1;
    }

    pub fn restart(&mut self) -> Result<EngineInfo, EngineError> {
        self.stop();
        self.start()
    }

    /// Replace the configuration and restart the engine with it.
    pub fn reconfigure(&mut self, config: EngineConfig) -> Result<EngineInfo, EngineError> {
        self.stop();
        self.config = config;
        self.start()
    }

    /// Search `fen` to at least the configured minimum depth.
    ///
    /// With `multipv > 1` only the first variation is reported.
    pub fn evaluate(&mut self, fen: &str, depth: u32, multipv: u32) -> Result<EvalResult, EngineError> {
        let turn = Side::from(Board::from_fen(fen)?.turn());
        if self.poisoned {
            return Err(EngineError::Evaluation(
                "engine session is unusable after an earlier failure, restart it".to_string(),
            ));
        }
        self.start()?;

        let limit = self.config.effective_depth(depth);
        let outcome = match self.process.as_mut() {
            Some(process) => search(process, &mut self.multipv, fen, limit, multipv.max(1), turn),
            None => Err(EngineError::Evaluation("engine is not running".to_string())),
        };

        match outcome {
            Ok((score, pv)) => Ok(EvalResult {
                score,
                bestmove: pv.first().cloned(),
                pv,
                depth,
                search_depth: limit,
                engine: self.info.clone(),
            }),
            Err(e) => {
                let e = match e {
                    EngineError::Io(io) => EngineError::Evaluation(io.to_string()),
                    other => other,
                };
                warn!(error = %e, fen, "Evaluation failed, session needs a restart");
                self.poisoned = true;
                Err(e)
            }
        }
    }
}

fn search(
    process: &mut EngineProcess,
    current_multipv: &mut u32,
    fen: &str,
    limit: u32,
    multipv: u32,
    turn: Side,
) -> Result<(Score, Vec<String>), EngineError> {
    if *current_multipv != multipv && process.supports_option("MultiPV") {
        process.set_option("MultiPV", multipv)?;
        *current_multipv = multipv;
    }

    let mut stream = process.search(fen, GoOptions::depth(limit))?;
    let last = stream.by_ref().try_fold(None, |last, update| {
        let update = update?;
        let primary = update.multipv.unwrap_or(1) == 1;
        Ok::<_, EngineError>(if primary && update.is_scored_line() {
            Some(update)
        } else {
            last
        })
    })?;
    stream.finish()?;

    if let Some((raw, pv)) = last.and_then(|info| info.score.map(|score| (score, info.pv))) {
        return Ok((Score::normalize(raw, turn, turn), pv));
    }

    debug!(fen, "No scored info line, asking for a best move only");
    let bestmove = process.search(fen, GoOptions::depth(limit))?.finish()?;
    Ok((Score::neutral(turn), bestmove.into_iter().collect()))
}

impl Drop for EngineSession {
    fn drop(&mut self) {
        self.stop();
    }
}
