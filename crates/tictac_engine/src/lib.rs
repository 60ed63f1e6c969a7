//! Tic-tac-toe round logic.
//!
//! # Architecture
//!
//! - **Types**: [`Board`], [`Cell`], [`Mark`] and the [`BoardSnapshot`] sent
//!   with recorded rounds
//! - **Rules**: pure win/draw checks over a board
//! - **Engine**: [`RoundEngine`], the per-round state machine with turn order
//!   and an optional per-move countdown
//! - **Status**: [`GameStatus`] and [`RoundWinner`], the vocabulary shared
//!   with the game store
//!
//! # Example
//!
//! ```
//! use tictac_engine::{Mark, Outcome, RoundEngine, RoundWinner};
//!
//! let mut round = RoundEngine::new();
//! for cell in [0, 3, 1, 4, 2] {
//!     round.apply_move(cell).unwrap();
//! }
//! assert_eq!(round.outcome(), Some(Outcome::Won(Mark::X)));
//! assert_eq!(round.round_winner(), Some(RoundWinner::Player1));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod difficulty;
mod engine;
pub mod rules;
mod status;
mod types;

pub use difficulty::Difficulty;
pub use engine::{MoveError, RoundEngine};
pub use rules::WinLine;
pub use status::{GameStatus, Outcome, RoundWinner};
pub use types::{Board, BoardSnapshot, Cell, Mark};
