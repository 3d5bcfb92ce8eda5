//! Review output types.

use serde::Serialize;

use crate::evaluation::Side;
use crate::session::EvalResult;

/// A move in engine notation, with SAN when it is known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Move {
    pub uci: String,
    pub san: Option<String>,
}

impl From<chess_notation::PlayedMove> for Move {
    fn from(played: chess_notation::PlayedMove) -> Self {
        Self {
            uci: played.uci,
            san: Some(played.san),
        }
    }
}

/// A ply whose evaluation swing crossed the blunder threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewMoment {
    /// 1-based ply number.
    pub ply: usize,
    /// Side that played the move.
    pub side: Side,
    #[serde(rename = "move")]
    pub mv: Move,
    /// Signed centipawn loss, see [`crate::review::loss_cp`].
    pub loss_cp: i32,
    pub before: EvalResult,
    pub after: EvalResult,
}

impl ReviewMoment {
    /// One line summary, e.g. `Ply 3 (white): g1f3 loss 150 cp`.
    pub fn digest(&self) -> String {
        format!(
            "Ply {} ({}): {} loss {} cp",
            self.ply, self.side, self.mv.uci, self.loss_cp
        )
    }
}

/// Everything a review found about one game.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewReport {
    pub initial_fen: String,
    pub moves: Vec<Move>,
    /// Key moments in ply order.
    pub moments: Vec<ReviewMoment>,
}
