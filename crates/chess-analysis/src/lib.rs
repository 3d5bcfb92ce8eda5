//! Engine-backed position evaluation and game review.
//!
//! # Overview
//!
//! - [`EngineSession`] - One UCI engine process with lazy start and restart
//! - [`Score`] - Side-relative evaluation (centipawn or mate)
//! - [`GameReviewer`] - Finds the plies where a game's evaluation swung
//! - [`Summarizer`] - Review prose from a language model, with an offline fallback
//!
//! # Example
//!
//! ```ignore
//! use chess_analysis::{EngineConfig, EngineSession, GameReviewer, ReviewConfig};
//!
//! let mut session = EngineSession::new(EngineConfig::default());
//! let eval = session.evaluate(chess_notation::STARTING_FEN, 16, 1)?;
//! println!("{} ({:?})", eval.score, eval.bestmove);
//!
//! let report = GameReviewer::new(&mut session, ReviewConfig::default())
//!     .review_pgn("1. e4 e5 2. Nf3 *")?;
//! println!("{} key moments", report.moments.len());
//! ```

pub mod config;
pub mod engine;
pub mod evaluation;
pub mod llm;
pub mod replay;
pub mod report;
pub mod review;
pub mod session;
pub mod summary;

pub use config::{EngineConfig, LlmConfig, ReviewConfig};
pub use engine::{EngineError, EngineInfo};
pub use evaluation::{Score, ScoreKind, Side, MATE_CP};
pub use report::{Move, ReviewMoment, ReviewReport};
pub use review::{loss_cp, Evaluator, GameReviewer, ReviewError};
pub use session::{EngineSession, EvalResult};
pub use summary::{fallback_summary, ReviewFocus, Summarizer, SummaryError, TextGenerator};
