//! UCI engine subprocess.
//!
//! [`EngineProcess`] owns the child process and its pipes. It knows the
//! protocol mechanics (handshake, `isready` sync, streaming a search) but
//! nothing about sessions or configuration; see [`crate::session`] for that.

use std::collections::BTreeMap;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use chess_notation::NotationError;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};
use uci::{EngineMessage, GoOptions, GuiCommand, SearchInfo};

/// Maximum number of lines to read before giving up on `uciok` or `readyok`.
pub const MAX_UCI_LINES: usize = 1000;

/// How long `quit` gets before the process is killed.
const QUIT_GRACE: Duration = Duration::from_millis(500);

/// Errors that can occur when working with the engine.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The executable could not be launched or the handshake did not finish.
    #[error("Failed to start engine '{path}': {reason}")]
    Start { path: String, reason: String },
    /// The engine crashed or broke the protocol during a search.
    #[error("Engine evaluation failed: {0}")]
    Evaluation(String),
    /// Pipe failure outside of a search.
    #[error("Engine I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The FEN handed to the engine does not describe a legal position.
    #[error(transparent)]
    InvalidPosition(#[from] NotationError),
}

/// Identity and configured options of a running engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineInfo {
    pub name: String,
    pub version: String,
    /// Option values that were applied after the handshake.
    pub options: BTreeMap<String, u32>,
}

impl Default for EngineInfo {
    fn default() -> Self {
        Self {
            name: "Unknown Engine".to_string(),
            version: "unknown".to_string(),
            options: BTreeMap::new(),
        }
    }
}

impl EngineInfo {
    /// Split an `id name` value into name and version.
    ///
    /// The version is the last whitespace separated token that starts with a
    /// digit, so `Stockfish 16.1` becomes (`Stockfish`, `16.1`).
    pub fn from_id_name(id_name: Option<&str>) -> Self {
        let mut info = Self::default();
        let Some(id_name) = id_name.map(str::trim).filter(|s| !s.is_empty()) else {
            return info;
        };

        let tokens: Vec<&str> = id_name.split_whitespace().collect();
        let version_at = tokens
            .iter()
            .rposition(|t| t.starts_with(|c: char| c.is_ascii_digit()));

        match version_at {
            Some(idx) if tokens.len() > 1 => {
                info.version = tokens[idx].to_string();
                info.name = tokens
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i != idx)
                    .map(|(_, t)| *t)
                    .collect::<Vec<_>>()
                    .join(" ");
            }
            _ => info.name = id_name.to_string(),
        }
        info
    }
}

/// A running UCI engine.
pub struct EngineProcess {
    process: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    id_name: Option<String>,
    advertised: Vec<String>,
    exited: bool,
}

impl EngineProcess {
    /// Launch `path` with `args` and run the handshake up to `uciok`.
    pub fn spawn(path: &str, args: &[String]) -> Result<Self, EngineError> {
        let start_error = |reason: String| EngineError::Start {
            path: path.to_string(),
            reason,
        };

        let mut process = Command::new(path)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| start_error(e.to_string()))?;

        let stdin = process.stdin.take();
        let stdout = process.stdout.take();
        let (Some(stdin), Some(stdout)) = (stdin, stdout) else {
            let _ = process.kill();
            let _ = process.wait();
            return Err(start_error("engine pipes unavailable".to_string()));
        };

        let mut engine = Self {
            process,
            stdin,
            stdout: BufReader::new(stdout),
            id_name: None,
            advertised: Vec::new(),
            exited: false,
        };

        // On failure `engine` is dropped here, which reaps the child.
        engine.handshake().map_err(|e| match e {
            EngineError::Evaluation(reason) => start_error(reason),
            other => start_error(other.to_string()),
        })?;
        Ok(engine)
    }

    fn handshake(&mut self) -> Result<(), EngineError> {
        self.send(&GuiCommand::Uci)?;

        for _ in 0..MAX_UCI_LINES {
            let line = self.read_line()?;
            match EngineMessage::parse(&line) {
                Ok(EngineMessage::UciOk) => {
                    debug!(options = ?self.advertised, "Engine advertised options");
                    return Ok(());
                }
                Ok(EngineMessage::Id {
                    name: Some(name), ..
                }) => self.id_name = Some(name),
                Ok(EngineMessage::Option(decl)) => self.advertised.push(decl.name),
                Ok(_) => {}
                Err(e) => debug!(error = %e, "Ignoring unparseable handshake line"),
            }
        }
        Err(EngineError::Evaluation(format!(
            "no uciok within {} lines",
            MAX_UCI_LINES
        )))
    }

    /// The raw `id name` value, if the engine sent one.
    pub fn id_name(&self) -> Option<&str> {
        self.id_name.as_deref()
    }

    /// Whether the engine declared an option with this name during the handshake.
    pub fn supports_option(&self, name: &str) -> bool {
        self.advertised.iter().any(|o| o.eq_ignore_ascii_case(name))
    }

    pub fn set_option(&mut self, name: &str, value: u32) -> Result<(), EngineError> {
        self.send(&GuiCommand::set_option(name, value))
    }

    /// Send `isready` and wait for `readyok`.
    pub fn sync(&mut self) -> Result<(), EngineError> {
        self.send(&GuiCommand::IsReady)?;
        for _ in 0..MAX_UCI_LINES {
            if self.read_line()? == "readyok" {
                return Ok(());
            }
        }
        Err(EngineError::Evaluation(format!(
            "no readyok within {} lines",
            MAX_UCI_LINES
        )))
    }

    /// Set up `fen` and start a search. The returned stream yields every
    /// `info` line until `bestmove`.
    pub fn search(&mut self, fen: &str, go: GoOptions) -> Result<AnalysisStream<'_>, EngineError> {
        self.send(&GuiCommand::fen(fen))?;
        self.send(&GuiCommand::Go(go))?;
        Ok(AnalysisStream {
            engine: self,
            bestmove: None,
            finished: false,
        })
    }

    pub fn send(&mut self, command: &GuiCommand) -> Result<(), EngineError> {
        let line = command.to_uci();
        debug!(target: "uci", ">> {}", line);
        writeln!(self.stdin, "{}", line)?;
        self.stdin.flush()?;
        Ok(())
    }

    fn read_line(&mut self) -> Result<String, EngineError> {
        let mut buf = Vec::new();
        let bytes = self.stdout.read_until(b'\n', &mut buf)?;
        if bytes == 0 {
            return Err(EngineError::Evaluation(
                "Engine closed unexpectedly".to_string(),
            ));
        }
        // Engines are not required to emit UTF-8 in `id` or `info string`.
        let line = String::from_utf8_lossy(&buf).trim().to_string();
        debug!(target: "uci", "<< {}", line);
        Ok(line)
    }

    /// Ask the engine to quit, killing it if it does not exit in time.
    pub fn shutdown(&mut self) {
        if self.exited {
            return;
        }
        self.exited = true;

        let _ = self.send(&GuiCommand::Quit);
        let deadline = Instant::now() + QUIT_GRACE;
        while Instant::now() < deadline {
            match self.process.try_wait() {
                Ok(Some(_)) => return,
                Ok(None) => thread::sleep(Duration::from_millis(20)),
                Err(_) => break,
            }
        }

        warn!("Engine did not quit in time, killing it");
        let _ = self.process.kill();
        let _ = self.process.wait();
    }
}

impl Drop for EngineProcess {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Lazy sequence of `info` updates from one search.
///
/// Ends after `bestmove`, which [`finish`](Self::finish) returns. Read errors
/// are yielded once and end the stream.
pub struct AnalysisStream<'a> {
    engine: &'a mut EngineProcess,
    bestmove: Option<Option<String>>,
    finished: bool,
}

impl AnalysisStream<'_> {
    /// Consume the rest of the stream and return the best move.
    pub fn finish(mut self) -> Result<Option<String>, EngineError> {
        for item in self.by_ref() {
            item?;
        }
        self.bestmove
            .take()
            .ok_or_else(|| EngineError::Evaluation("search ended without bestmove".to_string()))
    }
}

impl Iterator for AnalysisStream<'_> {
    type Item = Result<SearchInfo, EngineError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        loop {
            let line = match self.engine.read_line() {
                Ok(line) => line,
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e));
                }
            };
            match EngineMessage::parse(&line) {
                Ok(EngineMessage::Info(info)) => return Some(Ok(info)),
                Ok(EngineMessage::BestMove { mv, .. }) => {
                    self.bestmove = Some(mv);
                    self.finished = true;
                    return None;
                }
                Ok(_) => {}
                Err(e) => {
                    self.finished = true;
                    return Some(Err(EngineError::Evaluation(e.to_string())));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_not_found() {
        let result = EngineProcess::spawn("/nonexistent/path/to/stockfish", &[]);
        match result {
            Err(EngineError::Start { path, .. }) => {
                assert_eq!(path, "/nonexistent/path/to/stockfish");
            }
            Err(other) => panic!("Expected Start error, got {other}"),
            Ok(_) => panic!("Expected Start error"),
        }
    }

    #[test]
    fn engine_error_display() {
        let start = EngineError::Start {
            path: "/path/to/engine".to_string(),
            reason: "No such file".to_string(),
        };
        assert!(start.to_string().contains("/path/to/engine"));

        let eval = EngineError::Evaluation("Engine closed unexpectedly".to_string());
        assert!(eval.to_string().contains("closed unexpectedly"));
    }

    #[test]
    fn info_from_id_name_splits_version() {
        let info = EngineInfo::from_id_name(Some("Stockfish 16.1"));
        assert_eq!(info.name, "Stockfish");
        assert_eq!(info.version, "16.1");
        assert!(info.options.is_empty());
    }

    #[test]
    fn info_from_id_name_without_version() {
        let info = EngineInfo::from_id_name(Some("Fruit"));
        assert_eq!(info.name, "Fruit");
        assert_eq!(info.version, "unknown");

        let info = EngineInfo::from_id_name(Some("Komodo Dragon 3.3 by Ltd"));
        assert_eq!(info.name, "Komodo Dragon by Ltd");
        assert_eq!(info.version, "3.3");
    }

    #[test]
    fn info_defaults_when_engine_is_anonymous() {
        assert_eq!(EngineInfo::from_id_name(None), EngineInfo::default());
        assert_eq!(EngineInfo::from_id_name(Some("  ")).name, "Unknown Engine");
    }

    #[test]
    fn info_serializes_options_as_map() {
        let mut info = EngineInfo::from_id_name(Some("Stockfish 16"));
        info.options.insert("Threads".to_string(), 2);
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": "Stockfish", "version": "16", "options": {"Threads": 2}})
        );
    }
}
