//! PGN loading.
//!
//! Only the first game of the input and only its mainline are read.
//! Variations, comments and NAGs are skipped.

use std::ops::ControlFlow;

use pgn_reader::{RawTag, Reader, SanPlus, Skip, Visitor};
use serde::Serialize;

use crate::notation::Board;
use crate::{NotationError, STARTING_FEN};

/// Starting position and mainline of a PGN game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PgnGame {
    /// FEN from the `FEN` header, or the standard starting position.
    pub initial_fen: String,
    /// Mainline moves in UCI notation.
    pub moves_uci: Vec<String>,
}

impl PgnGame {
    fn empty() -> Self {
        Self {
            initial_fen: STARTING_FEN.to_string(),
            moves_uci: Vec::new(),
        }
    }
}

/// Tags collected during header parsing.
#[derive(Default)]
struct GameTags {
    fen: Option<String>,
}

/// State during movetext parsing.
struct GameState {
    board: Board,
    initial_fen: String,
    moves: Vec<String>,
}

/// Visitor that replays the mainline and records UCI moves.
struct MainlineCollector;

impl Visitor for MainlineCollector {
    type Tags = GameTags;
    type Movetext = GameState;
    type Output = Result<PgnGame, NotationError>;

    fn begin_tags(&mut self) -> ControlFlow<Self::Output, GameTags> {
        ControlFlow::Continue(GameTags::default())
    }

    fn tag(
        &mut self,
        tags: &mut GameTags,
        name: &[u8],
        value: RawTag<'_>,
    ) -> ControlFlow<Self::Output> {
        if name == b"FEN" {
            tags.fen = Some(value.decode_utf8_lossy().trim().to_string());
        }
        ControlFlow::Continue(())
    }

    fn begin_movetext(&mut self, tags: GameTags) -> ControlFlow<Self::Output, GameState> {
        let initial_fen = tags.fen.unwrap_or_else(|| STARTING_FEN.to_string());
        match Board::from_fen(&initial_fen) {
            Ok(board) => ControlFlow::Continue(GameState {
                board,
                initial_fen,
                moves: Vec::new(),
            }),
            Err(e) => ControlFlow::Break(Err(e)),
        }
    }

    fn san(&mut self, state: &mut GameState, san_plus: SanPlus) -> ControlFlow<Self::Output> {
        let san = san_plus.san.to_string();
        match state.board.play_san(&san) {
            Ok(played) => {
                state.moves.push(played.uci);
                ControlFlow::Continue(())
            }
            Err(e) => ControlFlow::Break(Err(e)),
        }
    }

    fn begin_variation(&mut self, _state: &mut GameState) -> ControlFlow<Self::Output, Skip> {
        ControlFlow::Continue(Skip(true))
    }

    fn end_game(&mut self, state: GameState) -> Self::Output {
        Ok(PgnGame {
            initial_fen: state.initial_fen,
            moves_uci: state.moves,
        })
    }
}

/// Read the first game of `pgn_text`.
///
/// Input without any game yields the standard starting position and no moves.
pub fn load_pgn(pgn_text: &str) -> Result<PgnGame, NotationError> {
    let mut reader = Reader::new(pgn_text.as_bytes());
    match reader.read_game(&mut MainlineCollector)? {
        Some(game) => game,
        None => Ok(PgnGame::empty()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_simple_game() {
        let pgn = r#"
[Event "?"]
[Site "?"]
[Date "2024.01.01"]
[Round "?"]
[White "White"]
[Black "Black"]
[Result "*"]

1. e4 e5 2. Nf3 Nc6 3. Bb5 *
"#;
        let game = load_pgn(pgn).unwrap();
        assert_eq!(game.initial_fen, STARTING_FEN);
        assert_eq!(game.moves_uci, vec!["e2e4", "e7e5", "g1f3", "b8c6", "f1b5"]);
    }

    #[test]
    fn load_game_with_fen_header() {
        let pgn = r#"[SetUp "1"]
[FEN "4k3/8/8/8/8/8/4P3/4K3 w - - 0 1"]

1. e4 Kd7 2. Kd2 *
"#;
        let game = load_pgn(pgn).unwrap();
        assert_eq!(game.initial_fen, "4k3/8/8/8/8/8/4P3/4K3 w - - 0 1");
        assert_eq!(game.moves_uci, vec!["e2e4", "e8d7", "e1d2"]);
    }

    #[test]
    fn variations_and_comments_are_skipped() {
        let pgn = "1. e4 {best by test} e5 (1... c5 2. Nf3) 2. Nf3 $1 Nc6 *";
        let game = load_pgn(pgn).unwrap();
        assert_eq!(game.moves_uci, vec!["e2e4", "e7e5", "g1f3", "b8c6"]);
    }

    #[test]
    fn empty_input_is_start_position() {
        let game = load_pgn("").unwrap();
        assert_eq!(game, PgnGame::empty());
    }

    #[test]
    fn illegal_move_is_an_error() {
        let err = load_pgn("1. e4 e5 2. Ke3 *").unwrap_err();
        assert!(matches!(err, NotationError::IllegalMove { .. }));
    }

    #[test]
    fn invalid_fen_header_is_an_error() {
        let err = load_pgn("[FEN \"garbage\"]\n\n1. e4 *").unwrap_err();
        assert!(matches!(err, NotationError::InvalidFen { .. }));
    }
}
