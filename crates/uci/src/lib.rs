//! Client side of the UCI (Universal Chess Interface) protocol.
//!
//! This crate formats the commands an analysis driver sends to a chess engine
//! and parses the lines the engine answers with. It does no I/O itself.
//!
//! # Commands sent to the engine
//!
//! - `uci` - Start the handshake, engine answers with `id`, `option` and `uciok`
//! - `setoption name <name> [value <value>]` - Configure an option
//! - `isready` / `readyok` - Synchronization
//! - `position fen <fen> [moves <move>...]` - Set position
//! - `go [depth <d>]` - Start search
//! - `quit` - Exit engine
//!
//! # Engine output
//!
//! - `id name <name>` / `id author <author>`
//! - `option name <name> type <type> [default <value>] ...`
//! - `info ...` - Search progress, see [`SearchInfo`]
//! - `bestmove <move> [ponder <move>]`

mod command;
mod info;
mod option;

pub use command::{GoOptions, GuiCommand};
pub use info::{Score, SearchInfo};
pub use option::OptionDecl;

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum UciError {
    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Messages sent from engine to GUI.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineMessage {
    /// Engine identification.
    Id {
        name: Option<String>,
        author: Option<String>,
    },
    /// Option advertised during the handshake.
    Option(OptionDecl),
    /// UCI initialization complete.
    UciOk,
    /// Engine is ready.
    ReadyOk,
    /// Search information.
    Info(SearchInfo),
    /// Search finished. `mv` is `None` when the engine has no legal move
    /// (`bestmove (none)` or the null move `0000`).
    BestMove {
        mv: Option<String>,
        ponder: Option<String>,
    },
    /// Anything else (`copyprotection`, `registration`, free-form text).
    Unknown(String),
}

impl EngineMessage {
    /// Parse one line of engine output.
    pub fn parse(line: &str) -> Result<Self, UciError> {
        let line = line.trim();
        let (keyword, rest) = match line.split_once(char::is_whitespace) {
            Some((keyword, rest)) => (keyword, rest.trim()),
            None => (line, ""),
        };

        match keyword {
            "uciok" => Ok(EngineMessage::UciOk),
            "readyok" => Ok(EngineMessage::ReadyOk),
            "id" => Self::parse_id(rest),
            "option" => OptionDecl::parse(line).map(EngineMessage::Option),
            "info" => SearchInfo::parse(line)
                .map(EngineMessage::Info)
                .ok_or_else(|| UciError::ParseError(line.to_string())),
            "bestmove" => Self::parse_bestmove(rest),
            _ => Ok(EngineMessage::Unknown(line.to_string())),
        }
    }

    fn parse_id(rest: &str) -> Result<Self, UciError> {
        match rest.split_once(char::is_whitespace) {
            Some(("name", value)) => Ok(EngineMessage::Id {
                name: Some(value.trim().to_string()),
                author: None,
            }),
            Some(("author", value)) => Ok(EngineMessage::Id {
                name: None,
                author: Some(value.trim().to_string()),
            }),
            _ => Err(UciError::ParseError(format!("Malformed id line: 'id {}'", rest))),
        }
    }

    fn parse_bestmove(rest: &str) -> Result<Self, UciError> {
        let mut parts = rest.split_whitespace();
        let mv = parts
            .next()
            .ok_or_else(|| UciError::ParseError("bestmove without a move".to_string()))?;

        let mv = match mv {
            "(none)" | "0000" => None,
            other => Some(other.to_string()),
        };

        let ponder = match (parts.next(), parts.next()) {
            (Some("ponder"), Some(p)) => Some(p.to_string()),
            _ => None,
        };

        Ok(EngineMessage::BestMove { mv, ponder })
    }
}
