//! Walks a move list and records the position around every ply.

use chess_notation::{Board, NotationError, PlayedMove};
use thiserror::Error;

use crate::evaluation::Side;

/// Positions immediately before and after one ply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlyPositions {
    /// 1-based ply number.
    pub ply: usize,
    /// Side to move before the ply.
    pub side: Side,
    pub played: PlayedMove,
    pub fen_before: String,
    pub fen_after: String,
}

/// Failure to replay a game, with the ply that broke it.
#[derive(Error, Debug)]
#[error("Cannot replay ply {ply}: {source}")]
pub struct ReplayError {
    /// 1-based ply, or 0 when the initial position itself is bad.
    pub ply: usize,
    pub source: NotationError,
}

/// Replay `moves` (UCI) from `initial_fen`.
pub fn replay(initial_fen: &str, moves: &[String]) -> Result<Vec<PlyPositions>, ReplayError> {
    let mut board = Board::from_fen(initial_fen).map_err(|source| ReplayError { ply: 0, source })?;

    moves
        .iter()
        .enumerate()
        .map(|(idx, uci)| {
            let ply = idx + 1;
            let side = Side::from(board.turn());
            let fen_before = board.fen();
            let played = board
                .play_uci(uci)
                .map_err(|source| ReplayError { ply, source })?;
            Ok(PlyPositions {
                ply,
                side,
                played,
                fen_before,
                fen_after: board.fen(),
            })
        })
        .collect()
}
