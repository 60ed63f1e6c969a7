//! Round state machine: turn order, terminal outcome and the move countdown.

use crate::rules::{WinLine, is_full, winning_line};
use crate::{Board, BoardSnapshot, Cell, Difficulty, GameStatus, Mark, Outcome, RoundWinner};
use tracing::{debug, info, instrument};

/// Reason a move was refused. A refused move leaves the round untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// The round already has a winner or is drawn.
    #[display("Round is already over")]
    RoundOver,

    /// The target cell holds a mark.
    #[display("Cell {} is already occupied", _0)]
    SquareOccupied(usize),

    /// The index is not a board cell.
    #[display("Cell {} is out of bounds (must be 0-8)", _0)]
    OutOfBounds(usize),

    /// The parent game is stopped.
    #[display("Game is not active")]
    GameInactive,
}

impl std::error::Error for MoveError {}

/// One round of play on a 3x3 board.
///
/// X moves first. When a difficulty is selected every move restarts a
/// countdown; [`RoundEngine::tick`] consumes one second of it and an expired
/// countdown ends the round in a draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundEngine {
    board: Board,
    to_move: Mark,
    outcome: Option<Outcome>,
    win_line: Option<WinLine>,
    difficulty: Option<Difficulty>,
    time_left: u32,
    game_status: GameStatus,
}

impl Default for RoundEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RoundEngine {
    /// Creates a fresh round for an active game.
    #[instrument]
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            to_move: Mark::X,
            outcome: None,
            win_line: None,
            difficulty: None,
            time_left: 0,
            game_status: GameStatus::Active,
        }
    }

    /// Current board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Mark that plays next.
    pub fn to_move(&self) -> Mark {
        self.to_move
    }

    /// Terminal outcome, if the round is over.
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Line to highlight when the round was won.
    pub fn win_line(&self) -> Option<WinLine> {
        self.win_line
    }

    /// Selected difficulty, if any.
    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }

    /// Seconds left on the countdown. Zero when no countdown is running.
    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    /// Status of the game this round belongs to.
    pub fn game_status(&self) -> GameStatus {
        self.game_status
    }

    /// True once the round has a winner or is drawn.
    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Winner in the game record's vocabulary, once the round is over.
    pub fn round_winner(&self) -> Option<RoundWinner> {
        self.outcome.map(RoundWinner::from)
    }

    /// Board snapshot suitable for recording the round.
    pub fn snapshot(&self) -> BoardSnapshot {
        self.board.snapshot()
    }

    /// Mirrors the parent game's status. A stopped game refuses moves and
    /// freezes the countdown.
    #[instrument(skip(self))]
    pub fn set_game_status(&mut self, status: GameStatus) {
        debug!(from = %self.game_status, to = %status, "Game status updated");
        self.game_status = status;
    }

    /// Places the current player's mark at `index` (0-8).
    ///
    /// # Errors
    ///
    /// Returns [`MoveError`] and leaves the round unchanged when the round is
    /// over, the game is not active, the index is off the board or the cell
    /// is taken.
    #[instrument(skip(self), fields(player = %self.to_move))]
    pub fn apply_move(&mut self, index: usize) -> Result<Option<Outcome>, MoveError> {
        if self.outcome.is_some() {
            return Err(MoveError::RoundOver);
        }
        if !self.game_status.is_active() {
            return Err(MoveError::GameInactive);
        }
        match self.board.get(index) {
            None => return Err(MoveError::OutOfBounds(index)),
            Some(Cell::Marked(_)) => return Err(MoveError::SquareOccupied(index)),
            Some(Cell::Empty) => {}
        }

        self.board
            .set(index, Cell::Marked(self.to_move))
            .map_err(|_| MoveError::OutOfBounds(index))?;

        if let Some(line) = winning_line(&self.board) {
            info!(winner = %line.mark, cells = ?line.cells, "Round won");
            self.finish(Outcome::Won(line.mark));
            self.win_line = Some(line);
        } else if is_full(&self.board) {
            info!("Round drawn on a full board");
            self.finish(Outcome::Draw);
        } else {
            self.to_move = self.to_move.opponent();
            if let Some(difficulty) = self.difficulty {
                self.time_left = difficulty.time_limit();
            }
            debug!(next = %self.to_move, time_left = self.time_left, "Turn passed");
        }

        Ok(self.outcome)
    }

    /// Selects a difficulty and restarts the countdown at its limit.
    ///
    /// # Errors
    ///
    /// Refused with [`MoveError::RoundOver`] or [`MoveError::GameInactive`]
    /// under the same conditions as a move.
    #[instrument(skip(self))]
    pub fn select_difficulty(&mut self, difficulty: Difficulty) -> Result<(), MoveError> {
        if self.outcome.is_some() {
            return Err(MoveError::RoundOver);
        }
        if !self.game_status.is_active() {
            return Err(MoveError::GameInactive);
        }
        self.difficulty = Some(difficulty);
        self.time_left = difficulty.time_limit();
        info!(time_left = self.time_left, "Countdown started");
        Ok(())
    }

    /// Advances the countdown by one second.
    ///
    /// Only counts down while a difficulty is selected, the round is open and
    /// the game is active. Hitting zero forces a draw. Returns the outcome
    /// after the tick.
    #[instrument(skip(self), fields(time_left = self.time_left))]
    pub fn tick(&mut self) -> Option<Outcome> {
        if self.difficulty.is_none()
            || self.outcome.is_some()
            || !self.game_status.is_active()
            || self.time_left == 0
        {
            return self.outcome;
        }

        self.time_left -= 1;
        if self.time_left == 0 {
            info!("Countdown expired, round drawn");
            self.outcome = Some(Outcome::Draw);
        }
        self.outcome
    }

    /// Whether the countdown still needs ticks.
    pub fn is_counting_down(&self) -> bool {
        self.difficulty.is_some()
            && self.outcome.is_none()
            && self.game_status.is_active()
            && self.time_left > 0
    }

    /// Clears the board for the next round of the same game.
    ///
    /// The game status is kept; everything else returns to its initial state.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        let game_status = self.game_status;
        *self = Self::new();
        self.game_status = game_status;
        debug!("Round reset");
    }

    fn finish(&mut self, outcome: Outcome) {
        self.outcome = Some(outcome);
        self.time_left = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(engine: &mut RoundEngine, moves: &[usize]) {
        for &index in moves {
            engine.apply_move(index).expect("legal move");
        }
    }

    #[test]
    fn test_x_moves_first_and_turns_alternate() {
        let mut engine = RoundEngine::new();
        assert_eq!(engine.to_move(), Mark::X);
        engine.apply_move(4).unwrap();
        assert_eq!(engine.to_move(), Mark::O);
        assert_eq!(engine.board().get(4), Some(Cell::Marked(Mark::X)));
    }

    #[test]
    fn test_win_freezes_timer() {
        let mut engine = RoundEngine::new();
        engine.select_difficulty(Difficulty::Hard).unwrap();
        play(&mut engine, &[0, 3, 1, 4]);
        let outcome = engine.apply_move(2).unwrap();

        assert_eq!(outcome, Some(Outcome::Won(Mark::X)));
        assert_eq!(engine.time_left(), 0);
        assert_eq!(engine.win_line().unwrap().cells, [0, 1, 2]);
        assert_eq!(engine.round_winner(), Some(RoundWinner::Player1));
    }

    #[test]
    fn test_move_resets_countdown() {
        let mut engine = RoundEngine::new();
        engine.select_difficulty(Difficulty::Medium).unwrap();
        for _ in 0..10 {
            engine.tick();
        }
        assert_eq!(engine.time_left(), 50);
        engine.apply_move(0).unwrap();
        assert_eq!(engine.time_left(), 60);
    }

    #[test]
    fn test_stopped_game_refuses_moves() {
        let mut engine = RoundEngine::new();
        engine.set_game_status(GameStatus::Stopped);
        assert_eq!(engine.apply_move(0), Err(MoveError::GameInactive));
        assert_eq!(engine.board(), &Board::new());
        assert_eq!(
            engine.select_difficulty(Difficulty::Easy),
            Err(MoveError::GameInactive)
        );
    }

    #[test]
    fn test_out_of_bounds() {
        let mut engine = RoundEngine::new();
        assert_eq!(engine.apply_move(9), Err(MoveError::OutOfBounds(9)));
        assert_eq!(engine.to_move(), Mark::X);
    }

    #[test]
    fn test_reset_keeps_game_status() {
        let mut engine = RoundEngine::new();
        engine.select_difficulty(Difficulty::Easy).unwrap();
        play(&mut engine, &[0, 1]);
        engine.set_game_status(GameStatus::Stopped);
        engine.reset();

        assert_eq!(engine.board(), &Board::new());
        assert_eq!(engine.to_move(), Mark::X);
        assert_eq!(engine.difficulty(), None);
        assert_eq!(engine.time_left(), 0);
        assert_eq!(engine.game_status(), GameStatus::Stopped);
    }

    #[test]
    fn test_tick_without_difficulty_is_inert() {
        let mut engine = RoundEngine::new();
        assert_eq!(engine.tick(), None);
        assert!(!engine.is_counting_down());
    }
}
