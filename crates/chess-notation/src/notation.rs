//! Move notation conversion.

use serde::Serialize;
use shakmaty::fen::Fen;
use shakmaty::san::{San, SanPlus};
use shakmaty::uci::UciMove;
use shakmaty::{CastlingMode, Chess, Color, EnPassantMode, Move, Position};

use crate::NotationError;

/// A move that was played on a [`Board`], in both notations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayedMove {
    /// Engine-exchange form, e.g. `g1f3`.
    pub uci: String,
    /// Standard algebraic notation with check suffix, e.g. `Nf3+`.
    pub san: String,
}

/// A validated position.
#[derive(Debug, Clone)]
pub struct Board {
    pos: Chess,
}

impl Board {
    /// Parse a FEN string into a playable position.
    pub fn from_fen(fen: &str) -> Result<Self, NotationError> {
        let invalid = |reason: String| NotationError::InvalidFen {
            fen: fen.to_string(),
            reason,
        };
        let parsed: Fen = fen.trim().parse().map_err(|e| invalid(format!("{}", e)))?;
        let pos = parsed
            .into_position::<Chess>(CastlingMode::Standard)
            .map_err(|e| invalid(format!("{}", e)))?;
        Ok(Self { pos })
    }

    /// FEN of the current position.
    pub fn fen(&self) -> String {
        Fen::from_position(&self.pos, EnPassantMode::Legal).to_string()
    }

    /// Side to move.
    pub fn turn(&self) -> Color {
        self.pos.turn()
    }

    /// All legal moves in UCI notation, in generation order.
    pub fn legal_moves(&self) -> Vec<String> {
        self.pos
            .legal_moves()
            .iter()
            .map(|m| m.to_uci(CastlingMode::Standard).to_string())
            .collect()
    }

    /// Resolve a UCI string to a legal move.
    pub fn parse_uci(&self, uci: &str) -> Result<Move, NotationError> {
        let parsed: UciMove = uci
            .trim()
            .parse()
            .map_err(|_| NotationError::InvalidUci(uci.to_string()))?;
        parsed.to_move(&self.pos).map_err(|_| self.illegal(uci))
    }

    /// Resolve a SAN string (check suffix optional) to a legal move.
    pub fn parse_san(&self, san: &str) -> Result<Move, NotationError> {
        let parsed: SanPlus = san
            .trim()
            .parse()
            .map_err(|_| NotationError::InvalidSan(san.to_string()))?;
        parsed.san.to_move(&self.pos).map_err(|_| self.illegal(san))
    }

    /// Play a legal move and report it in both notations.
    pub fn play(&mut self, mv: Move) -> PlayedMove {
        let uci = mv.to_uci(CastlingMode::Standard).to_string();
        let san = San::from_move(&self.pos, mv.clone()).to_string();
        self.pos.play_unchecked(mv);

        let suffix = if self.pos.is_checkmate() {
            "#"
        } else if self.pos.is_check() {
            "+"
        } else {
            ""
        };

        PlayedMove {
            uci,
            san: format!("{}{}", san, suffix),
        }
    }

    /// Parse and play a UCI move.
    pub fn play_uci(&mut self, uci: &str) -> Result<PlayedMove, NotationError> {
        let mv = self.parse_uci(uci)?;
        Ok(self.play(mv))
    }

    /// Parse and play a SAN move.
    pub fn play_san(&mut self, san: &str) -> Result<PlayedMove, NotationError> {
        let mv = self.parse_san(san)?;
        Ok(self.play(mv))
    }

    fn illegal(&self, mv: &str) -> NotationError {
        NotationError::IllegalMove {
            mv: mv.to_string(),
            fen: self.fen(),
        }
    }
}

/// Legal moves of a FEN position in UCI notation.
pub fn legal_moves(fen: &str) -> Result<Vec<String>, NotationError> {
    Ok(Board::from_fen(fen)?.legal_moves())
}

/// Convert a sequence of UCI moves played from `fen` to SAN.
pub fn uci_to_san(fen: &str, uci_moves: &[String]) -> Result<Vec<String>, NotationError> {
    let mut board = Board::from_fen(fen)?;
    uci_moves
        .iter()
        .map(|u| board.play_uci(u).map(|played| played.san))
        .collect()
}

/// Convert a sequence of SAN moves played from `fen` to UCI.
pub fn san_to_uci(fen: &str, san_moves: &[String]) -> Result<Vec<String>, NotationError> {
    let mut board = Board::from_fen(fen)?;
    san_moves
        .iter()
        .map(|s| board.play_san(s).map(|played| played.uci))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::STARTING_FEN;
    use proptest::prelude::*;

    fn strings(moves: &[&str]) -> Vec<String> {
        moves.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn legal_moves_from_start() {
        let moves = legal_moves(STARTING_FEN).unwrap();
        assert_eq!(moves.len(), 20);
        assert!(moves.contains(&"e2e4".to_string()));
        assert!(!moves.contains(&"e7e5".to_string()));
    }

    #[test]
    fn invalid_fen_is_rejected() {
        let err = legal_moves("not a fen").unwrap_err();
        assert!(matches!(err, NotationError::InvalidFen { .. }));
        assert!(err.to_string().contains("not a fen"));

        // Two white kings
        assert!(Board::from_fen("8/8/8/8/8/8/8/KK5k w - - 0 1").is_err());
    }

    #[test]
    fn uci_to_san_italian() {
        let san = uci_to_san(STARTING_FEN, &strings(&["e2e4", "e7e5", "g1f3", "b8c6", "f1c4"]))
            .unwrap();
        assert_eq!(san, vec!["e4", "e5", "Nf3", "Nc6", "Bc4"]);
    }

    #[test]
    fn san_carries_check_and_mate_suffixes() {
        let san = uci_to_san(
            STARTING_FEN,
            &strings(&["f2f3", "e7e5", "g2g4", "d8h4"]),
        )
        .unwrap();
        assert_eq!(san.last().map(String::as_str), Some("Qh4#"));

        let san = uci_to_san(STARTING_FEN, &strings(&["e2e4", "f7f6", "d1h5"])).unwrap();
        assert_eq!(san.last().map(String::as_str), Some("Qh5+"));
    }

    #[test]
    fn san_to_uci_accepts_suffixes() {
        let uci = san_to_uci(STARTING_FEN, &strings(&["f3", "e5", "g4", "Qh4#"])).unwrap();
        assert_eq!(uci, vec!["f2f3", "e7e5", "g2g4", "d8h4"]);
        let uci = san_to_uci(STARTING_FEN, &strings(&["f3", "e5", "g4", "Qh4"])).unwrap();
        assert_eq!(uci.last().map(String::as_str), Some("d8h4"));
    }

    #[test]
    fn castling_uses_king_destination() {
        let fen = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1";
        let uci = san_to_uci(fen, &strings(&["O-O"])).unwrap();
        assert_eq!(uci, vec!["e1g1"]);
        let san = uci_to_san(fen, &strings(&["e1c1"])).unwrap();
        assert_eq!(san, vec!["O-O-O"]);
    }

    #[test]
    fn illegal_and_malformed_moves() {
        let err = uci_to_san(STARTING_FEN, &strings(&["e2e5"])).unwrap_err();
        assert!(matches!(err, NotationError::IllegalMove { .. }));

        let err = uci_to_san(STARTING_FEN, &strings(&["hello"])).unwrap_err();
        assert!(matches!(err, NotationError::InvalidUci(_)));

        let err = san_to_uci(STARTING_FEN, &strings(&["Ke2"])).unwrap_err();
        assert!(matches!(err, NotationError::IllegalMove { .. }));
    }

    #[test]
    fn board_tracks_turn_and_fen() {
        let mut board = Board::from_fen(STARTING_FEN).unwrap();
        assert_eq!(board.turn(), Color::White);
        let played = board.play_uci("e2e4").unwrap();
        assert_eq!(played.san, "e4");
        assert_eq!(board.turn(), Color::Black);
        // No legal en passant capture, so no en passant square in the FEN.
        assert_eq!(
            board.fen(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1"
        );
    }

    proptest! {
        #[test]
        fn random_playouts_convert_both_ways(choices in prop::collection::vec(any::<usize>(), 0..40)) {
            let mut board = Board::from_fen(STARTING_FEN).unwrap();
            let mut played = Vec::new();
            for choice in choices {
                let moves = board.legal_moves();
                if moves.is_empty() {
                    break;
                }
                let uci = moves[choice % moves.len()].clone();
                board.play_uci(&uci).unwrap();
                played.push(uci);
            }

            let san = uci_to_san(STARTING_FEN, &played).unwrap();
            prop_assert_eq!(san_to_uci(STARTING_FEN, &san).unwrap(), played);
        }
    }
}
