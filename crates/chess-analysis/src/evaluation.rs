//! Chess position evaluation types.
//!
//! Engines report scores relative to the side to move. [`Score::normalize`]
//! pins a raw engine score to an explicit perspective so that scores from
//! different plies can be compared after [`Score::to_centipawns`].

use std::fmt;

use chess_notation::Color;
use serde::{Deserialize, Serialize};

/// Centipawn stand-in for a forced mate, used only for comparisons.
///
/// Exact mate distances are not distinguished: a mate only needs to dominate
/// any real centipawn swing.
pub const MATE_CP: i32 = 100_000;

/// One side of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    White,
    Black,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }
}

impl From<Color> for Side {
    fn from(color: Color) -> Self {
        match color {
            Color::White => Side::White,
            Color::Black => Side::Black,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::White => write!(f, "white"),
            Side::Black => write!(f, "black"),
        }
    }
}

/// Whether a score is a positional estimate or a forced mate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreKind {
    #[serde(rename = "cp")]
    Centipawn,
    #[serde(rename = "mate")]
    Mate,
}

/// Represents a chess position evaluation.
///
/// Evaluations can be either centipawn scores (for normal positions)
/// or mate scores (when a forced mate is found). Positive values favor
/// `perspective`; for mates, positive means `perspective` delivers mate in
/// `value` moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    #[serde(rename = "type")]
    pub kind: ScoreKind,
    pub value: i32,
    pub perspective: Side,
}

impl Score {
    pub fn centipawns(value: i32, perspective: Side) -> Self {
        Self {
            kind: ScoreKind::Centipawn,
            value,
            perspective,
        }
    }

    pub fn mate(moves: i32, perspective: Side) -> Self {
        Self {
            kind: ScoreKind::Mate,
            value: moves,
            perspective,
        }
    }

    /// Score for a search that produced no evaluation at all.
    pub fn neutral(perspective: Side) -> Self {
        Self::centipawns(0, perspective)
    }

    /// Canonical score for an engine report.
    ///
    /// `pov` is the side the engine scored for and `turn` the side on move in
    /// the searched position. The result is always from `turn`'s perspective.
    pub fn normalize(raw: uci::Score, pov: Side, turn: Side) -> Self {
        let sign = if pov == turn { 1 } else { -1 };
        match raw {
            uci::Score::Cp(cp) => Self::centipawns(sign * cp, turn),
            uci::Score::Mate(moves) => Self::mate(sign * moves, turn),
        }
    }

    /// Centipawn value for comparisons, with mates mapped to [`MATE_CP`].
    pub fn to_centipawns(&self) -> i32 {
        match self.kind {
            ScoreKind::Centipawn => self.value,
            ScoreKind::Mate => MATE_CP * self.value.signum(),
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ScoreKind::Centipawn => write!(f, "{:+.2}", self.value as f64 / 100.0),
            ScoreKind::Mate if self.value < 0 => write!(f, "-M{}", -self.value),
            ScoreKind::Mate => write!(f, "M{}", self.value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn mate_converts_to_proxy() {
        assert_eq!(Score::mate(3, Side::White).to_centipawns(), 100_000);
        assert_eq!(Score::mate(-1, Side::Black).to_centipawns(), -100_000);
        assert_eq!(Score::mate(0, Side::White).to_centipawns(), 0);
    }

    #[test]
    fn centipawns_convert_to_themselves() {
        assert_eq!(Score::centipawns(-42, Side::Black).to_centipawns(), -42);
        assert_eq!(Score::neutral(Side::White).to_centipawns(), 0);
        assert_eq!(Score::neutral(Side::White).kind, ScoreKind::Centipawn);
    }

    #[test]
    fn normalize_same_pov_keeps_sign() {
        let score = Score::normalize(uci::Score::Cp(35), Side::Black, Side::Black);
        assert_eq!(score, Score::centipawns(35, Side::Black));

        let score = Score::normalize(uci::Score::Mate(-2), Side::White, Side::White);
        assert_eq!(score, Score::mate(-2, Side::White));
    }

    #[test]
    fn normalize_other_pov_flips_sign() {
        let score = Score::normalize(uci::Score::Cp(35), Side::White, Side::Black);
        assert_eq!(score, Score::centipawns(-35, Side::Black));

        let score = Score::normalize(uci::Score::Mate(4), Side::Black, Side::White);
        assert_eq!(score, Score::mate(-4, Side::White));
    }

    #[test]
    fn serializes_with_type_tag() {
        let json = serde_json::to_value(Score::mate(2, Side::White)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "mate", "value": 2, "perspective": "white"})
        );
        let json = serde_json::to_value(Score::centipawns(-15, Side::Black)).unwrap();
        assert_eq!(json["type"], "cp");
    }

    #[test]
    fn display() {
        assert_eq!(Score::centipawns(135, Side::White).to_string(), "+1.35");
        assert_eq!(Score::centipawns(-50, Side::White).to_string(), "-0.50");
        assert_eq!(Score::mate(3, Side::White).to_string(), "M3");
        assert_eq!(Score::mate(-3, Side::White).to_string(), "-M3");
    }

    proptest! {
        #[test]
        fn mate_proxy_dominates_any_centipawn_score(moves in -200i32..200, cp in -20_000i32..20_000) {
            let mate = Score::mate(moves, Side::White).to_centipawns();
            prop_assert_eq!(mate.signum(), moves.signum());
            if moves != 0 {
                prop_assert!(mate.abs() > cp.abs());
            }
        }

        #[test]
        fn normalizing_twice_across_sides_round_trips(cp in -5_000i32..5_000) {
            let black_view = Score::normalize(uci::Score::Cp(cp), Side::White, Side::Black);
            let white_view = Score::normalize(uci::Score::Cp(black_view.value), Side::Black, Side::White);
            prop_assert_eq!(white_view.value, cp);
        }
    }
}
