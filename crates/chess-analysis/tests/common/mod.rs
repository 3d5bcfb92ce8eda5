//! Scripted stand-in for a UCI engine.
//!
//! The engine is a POSIX shell script run through `/bin/sh`. It appends every
//! command it receives to a log file so tests can check the conversation.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use chess_analysis::EngineConfig;
use tempfile::TempDir;

/// Well-behaved engine. White to move scores `cp 50` with pv `d2d4 d7d5`,
/// black to move scores `cp -100` with pv `c7c5 g1f3`. Advertises `Threads`,
/// `Hash` and `MultiPV` but not `Skill Level`.
pub const STANDARD: &str = r#"
log="@LOG@"
side=w
while IFS= read -r line; do
  printf '%s\n' "$line" >> "$log"
  case "$line" in
    uci)
      echo "id name FakeFish 1.2"
      echo "id author Test Suite"
      echo "option name Threads type spin default 1 min 1 max 512"
      echo "option name Hash type spin default 16 min 1 max 33554432"
      echo "option name MultiPV type spin default 1 min 1 max 500"
      echo "uciok"
      ;;
    isready)
      echo "readyok"
      ;;
    position*)
      set -- $line
      side=$4
      ;;
    go*)
      if [ "$side" = "w" ]; then
        echo "info depth 1 seldepth 1 score cp 20 nodes 20 pv e2e4"
        echo "info depth 2 seldepth 2 multipv 1 score cp 50 nodes 400 nps 4000 pv d2d4 d7d5"
        echo "info depth 2 seldepth 2 multipv 2 score cp -300 nodes 400 pv a2a3"
        echo "info depth 2 currmove e2e4 currmovenumber 1"
        echo "bestmove d2d4 ponder d7d5"
      else
        echo "info depth 1 score cp -30 pv c7c5"
        echo "info depth 2 score cp -100 pv c7c5 g1f3"
        echo "info string searching done"
        echo "bestmove c7c5 ponder g1f3"
      fi
      ;;
    quit)
      exit 0
      ;;
  esac
done
"#;

/// Never reports a score, only a best move.
pub const SCORELESS: &str = r#"
log="@LOG@"
while IFS= read -r line; do
  printf '%s\n' "$line" >> "$log"
  case "$line" in
    uci) echo "id name Silent"; echo "uciok" ;;
    isready) echo "readyok" ;;
    go*) echo "info depth 1 nodes 10"; echo "bestmove e2e4" ;;
    quit) exit 0 ;;
  esac
done
"#;

/// Has no move to offer in any position.
pub const NO_MOVE: &str = r#"
log="@LOG@"
while IFS= read -r line; do
  printf '%s\n' "$line" >> "$log"
  case "$line" in
    uci) echo "uciok" ;;
    isready) echo "readyok" ;;
    go*) echo "info depth 0 score mate 0"; echo "bestmove (none)" ;;
    quit) exit 0 ;;
  esac
done
"#;

/// Dies on its first search, behaves on later runs.
pub const CRASH_ONCE: &str = r#"
log="@LOG@"
while IFS= read -r line; do
  printf '%s\n' "$line" >> "$log"
  case "$line" in
    uci) echo "id name Flaky 0.1"; echo "uciok" ;;
    isready) echo "readyok" ;;
    go*)
      if [ ! -f "$log.crashed" ]; then
        : > "$log.crashed"
        exit 1
      fi
      echo "info depth 3 score mate 2 pv d1h5"
      echo "bestmove d1h5"
      ;;
    quit) exit 0 ;;
  esac
done
"#;

/// Exits before the handshake.
pub const EXITS_IMMEDIATELY: &str = "exit 0\n";

/// Talks forever without ever finishing the handshake.
pub const NEVER_UCIOK: &str = r#"
log="@LOG@"
while IFS= read -r line; do
  printf '%s\n' "$line" >> "$log"
  case "$line" in
    uci)
      i=0
      while [ $i -lt 1100 ]; do echo "info string warming up"; i=$((i+1)); done
      ;;
    quit) exit 0 ;;
  esac
done
"#;

/// Finishes the handshake but answers `isready` with chatter only.
pub const NEVER_READYOK: &str = r#"
log="@LOG@"
while IFS= read -r line; do
  printf '%s\n' "$line" >> "$log"
  case "$line" in
    uci) echo "id name Sleepy 2"; echo "uciok" ;;
    isready)
      i=0
      while [ $i -lt 1100 ]; do echo "info string loading"; i=$((i+1)); done
      ;;
    quit) exit 0 ;;
  esac
done
"#;

/// Sends Latin-1 bytes in its identity and search chatter.
pub const LATIN1: &str = r#"
log="@LOG@"
while IFS= read -r line; do
  printf '%s\n' "$line" >> "$log"
  case "$line" in
    uci) printf 'id name Caf\351 3\n'; echo "uciok" ;;
    isready) echo "readyok" ;;
    go*)
      printf 'info string r\351sum\351\n'
      echo "info depth 2 score cp 15 pv g1f3"
      echo "bestmove g1f3"
      ;;
    quit) exit 0 ;;
  esac
done
"#;

pub struct FakeEngine {
    _dir: TempDir,
    pub script: PathBuf,
    pub log: PathBuf,
}

impl FakeEngine {
    pub fn standard() -> Self {
        Self::with_script(STANDARD)
    }

    pub fn with_script(body: &str) -> Self {
        let dir = tempfile::tempdir().expect("temp dir");
        let log = dir.path().join("commands.log");
        let script = dir.path().join("engine.sh");
        fs::write(&script, body.replace("@LOG@", &log.display().to_string()))
            .expect("write engine script");
        Self {
            _dir: dir,
            script,
            log,
        }
    }

    /// Engine configuration pointing at this script, with no depth floor.
    pub fn config(&self) -> EngineConfig {
        EngineConfig {
            path: "/bin/sh".to_string(),
            args: vec![self.script.display().to_string()],
            min_depth: 1,
            ..EngineConfig::default()
        }
    }

    /// Every command the engine received so far, in order.
    pub fn commands(&self) -> Vec<String> {
        fs::read_to_string(&self.log)
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    pub fn count(&self, command: &str) -> usize {
        self.commands().iter().filter(|c| c.as_str() == command).count()
    }
}
