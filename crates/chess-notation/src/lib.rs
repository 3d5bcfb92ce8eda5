//! Chess rules collaborator for the analysis service.
//!
//! Everything that needs to know the rules of chess goes through this crate:
//! FEN validation, legal move generation, UCI/SAN conversion, applying moves
//! and reading PGN. The heavy lifting is done by [`shakmaty`] and
//! [`pgn_reader`]; this crate only narrows their API down to strings in and
//! strings out.
//!
//! # Overview
//!
//! - [`Board`] - A validated position that moves can be played on
//! - [`legal_moves`], [`uci_to_san`], [`san_to_uci`] - Notation helpers on FEN strings
//! - [`load_pgn`] - Starting position and mainline moves of a PGN game

pub mod notation;
pub mod pgn;

pub use notation::{legal_moves, san_to_uci, uci_to_san, Board, PlayedMove};
pub use pgn::{load_pgn, PgnGame};
pub use shakmaty::Color;

use thiserror::Error;

/// FEN of the standard starting position.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Errors reported by the rules collaborator.
#[derive(Error, Debug)]
pub enum NotationError {
    /// The FEN could not be parsed or describes an impossible position.
    #[error("Invalid FEN '{fen}': {reason}")]
    InvalidFen { fen: String, reason: String },
    /// The string is not syntactically a UCI move.
    #[error("Invalid UCI move: {0}")]
    InvalidUci(String),
    /// The string is not syntactically a SAN move.
    #[error("Invalid SAN move: {0}")]
    InvalidSan(String),
    /// The move is well-formed but not legal in the position.
    #[error("Illegal move {mv} in position {fen}")]
    IllegalMove { mv: String, fen: String },
    /// Reading the PGN text failed.
    #[error("Failed to read PGN: {0}")]
    Pgn(#[from] std::io::Error),
}
