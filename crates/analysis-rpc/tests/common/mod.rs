//! Scripted UCI engine for exercising the service end to end.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use chess_analysis::EngineConfig;
use tempfile::TempDir;

/// Scores `cp 50` for White to move and `cp -100` for Black to move, so
/// every ply of a review loses exactly 150 centipawns.
const SCRIPT: &str = r#"
log="@LOG@"
side=w
while IFS= read -r line; do
  printf '%s\n' "$line" >> "$log"
  case "$line" in
    uci)
      echo "id name FakeFish 1.2"
      echo "option name Threads type spin default 1 min 1 max 512"
      echo "option name Hash type spin default 16 min 1 max 4096"
      echo "option name Skill Level type spin default 20 min 0 max 20"
      echo "uciok"
      ;;
    isready) echo "readyok" ;;
    position*)
      set -- $line
      side=$4
      ;;
    go*)
      if [ "$side" = "w" ]; then
        echo "info depth 5 score cp 50 pv d2d4 d7d5"
        echo "bestmove d2d4"
      else
        echo "info depth 5 score cp -100 pv c7c5"
        echo "bestmove c7c5"
      fi
      ;;
    quit) exit 0 ;;
  esac
done
"#;

pub struct FakeEngine {
    _dir: TempDir,
    pub log: PathBuf,
    script: PathBuf,
}

impl FakeEngine {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("temp dir");
        let log = dir.path().join("commands.log");
        let script = dir.path().join("engine.sh");
        fs::write(&script, SCRIPT.replace("@LOG@", &log.display().to_string()))
            .expect("write engine script");
        Self {
            _dir: dir,
            log,
            script,
        }
    }

    pub fn config(&self) -> EngineConfig {
        EngineConfig {
            path: "/bin/sh".to_string(),
            args: vec![self.script.display().to_string()],
            min_depth: 1,
            ..EngineConfig::default()
        }
    }

    pub fn commands(&self) -> Vec<String> {
        fs::read_to_string(&self.log)
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }
}
