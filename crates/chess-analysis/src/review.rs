//! Game review: find the plies where the evaluation swung.
//!
//! Every ply is evaluated twice, once before and once after the move, at the
//! same depth. Nothing is cached between plies.

use chess_notation::{load_pgn, NotationError};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::ReviewConfig;
use crate::engine::EngineError;
use crate::evaluation::Side;
use crate::replay::replay;
use crate::report::{Move, ReviewMoment, ReviewReport};
use crate::session::{EngineSession, EvalResult};

/// Errors that can occur during a review.
#[derive(Error, Debug)]
pub enum ReviewError {
    /// Error from the analysis engine.
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),
    /// The PGN or starting position could not be read.
    #[error("Invalid game data: {0}")]
    InvalidGame(#[from] NotationError),
    /// A move does not apply to the position it was played in.
    #[error("Illegal move at ply {ply}: {source}")]
    IllegalMove { ply: usize, source: NotationError },
}

/// Something that can score a position.
pub trait Evaluator {
    fn evaluate_position(&mut self, fen: &str, depth: u32) -> Result<EvalResult, EngineError>;
}

impl Evaluator for EngineSession {
    fn evaluate_position(&mut self, fen: &str, depth: u32) -> Result<EvalResult, EngineError> {
        self.evaluate(fen, depth, 1)
    }
}

/// Signed loss for the side that moved.
///
/// `before` is scored for the mover and `after` for the opponent, both in
/// centipawns. White: `before - after`. Black: `-(before - after)`.
pub fn loss_cp(side: Side, before: i32, after: i32) -> i32 {
    match side {
        Side::White => before - after,
        Side::Black => -(before - after),
    }
}

/// Reviews games with a borrowed [`Evaluator`].
pub struct GameReviewer<'a, E: Evaluator + ?Sized> {
    evaluator: &'a mut E,
    config: ReviewConfig,
}

impl<'a, E: Evaluator + ?Sized> GameReviewer<'a, E> {
    pub fn new(evaluator: &'a mut E, config: ReviewConfig) -> Self {
        Self { evaluator, config }
    }

    /// Review `moves` (UCI) played from `initial_fen`.
    pub fn review(&mut self, initial_fen: &str, moves: &[String]) -> Result<ReviewReport, ReviewError> {
        let plies = replay(initial_fen, moves).map_err(|e| match e.ply {
            0 => ReviewError::InvalidGame(e.source),
            ply => ReviewError::IllegalMove {
                ply,
                source: e.source,
            },
        })?;

        let depth = self.config.depth;
        let threshold = self.config.blunder_threshold_cp;
        info!(plies = plies.len(), depth, threshold, "Reviewing game");

        let mut report_moves = Vec::with_capacity(plies.len());
        let mut moments = Vec::new();

        for ply in plies {
            let before = self.evaluator.evaluate_position(&ply.fen_before, depth)?;
            let after = self.evaluator.evaluate_position(&ply.fen_after, depth)?;
            let loss = loss_cp(ply.side, before.score.to_centipawns(), after.score.to_centipawns());
            debug!(ply = ply.ply, mv = %ply.played.uci, loss, "Evaluated ply");

            let mv = Move::from(ply.played);
            if loss.abs() >= threshold {
                moments.push(ReviewMoment {
                    ply: ply.ply,
                    side: ply.side,
                    mv: mv.clone(),
                    loss_cp: loss,
                    before,
                    after,
                });
            }
            report_moves.push(mv);
        }

        info!(moments = moments.len(), "Review finished");
        Ok(ReviewReport {
            initial_fen: initial_fen.to_string(),
            moves: report_moves,
            moments,
        })
    }

    /// Review the mainline of a PGN document.
    pub fn review_pgn(&mut self, pgn: &str) -> Result<ReviewReport, ReviewError> {
        let game = load_pgn(pgn)?;
        self.review(&game.initial_fen, &game.moves_uci)
    }
}
