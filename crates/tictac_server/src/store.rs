//! Game store business logic layer.

use derive_more::{Display, Error, From};
use std::str::FromStr;
use tictac_engine::{BoardSnapshot, RoundWinner};
use tracing::{debug, info, instrument, warn};

use crate::db::{DbError, GameRepository};
use crate::game::Game;

/// Errors surfaced by [`GameStore`] operations.
#[derive(Debug, Clone, Display, Error, From)]
pub enum StoreError {
    /// Missing or malformed input.
    #[display("{}", _0)]
    #[from(skip)]
    Validation(#[error(not(source))] String),

    /// No game has the given id.
    #[display("Game not found")]
    #[from(skip)]
    NotFound(#[error(not(source))] String),

    /// The game is not in a state that allows the change.
    #[display("{}", _0)]
    #[from(skip)]
    InvalidState(#[error(not(source))] String),

    /// Persistence failed.
    #[display("{}", _0)]
    Database(DbError),
}

/// Service layer over [`GameRepository`] enforcing the game rules:
/// non-empty player names, known round winners, and no rounds after stop.
#[derive(Debug, Clone)]
pub struct GameStore {
    repository: GameRepository,
}

impl GameStore {
    /// Creates a store backed by the given repository.
    #[instrument(skip(repository))]
    pub fn new(repository: GameRepository) -> Self {
        info!("Creating GameStore");
        Self { repository }
    }

    /// Returns the underlying repository.
    pub fn repository(&self) -> &GameRepository {
        &self.repository
    }

    /// Creates a new active game for two players.
    ///
    /// Names are trimmed; a missing or blank name is rejected before anything
    /// is written.
    ///
    /// # Errors
    ///
    /// [`StoreError::Validation`] for a missing name, [`StoreError::Database`]
    /// if the insert fails.
    #[instrument(skip(self))]
    pub fn create_game(
        &self,
        player1: Option<&str>,
        player2: Option<&str>,
    ) -> Result<Game, StoreError> {
        let player1 = player1.map(str::trim).unwrap_or_default();
        let player2 = player2.map(str::trim).unwrap_or_default();
        if player1.is_empty() || player2.is_empty() {
            warn!("Rejected game without both player names");
            return Err(StoreError::Validation(
                "player1 and player2 are required".to_string(),
            ));
        }

        let game = Game::new(player1.to_string(), player2.to_string());
        let game = self.repository.insert_game(&game)?;
        info!(game_id = %game.id, player1 = %game.player1, player2 = %game.player2, "Game created");
        Ok(game)
    }

    /// Lists every game, newest first.
    ///
    /// # Errors
    ///
    /// [`StoreError::Database`] if the query fails.
    #[instrument(skip(self))]
    pub fn list_games(&self) -> Result<Vec<Game>, StoreError> {
        Ok(self.repository.list_games()?)
    }

    /// Fetches one game.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] if no game has this id.
    #[instrument(skip(self))]
    pub fn get_game(&self, id: &str) -> Result<Game, StoreError> {
        self.repository
            .find_game(id)?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Records a finished round on an active game.
    ///
    /// `winner` must be `player1`, `player2` or `draw`. The board is optional
    /// and, when given, must be empty or 3 rows of 3 cells.
    ///
    /// # Errors
    ///
    /// [`StoreError::Validation`] for a bad winner or board,
    /// [`StoreError::NotFound`] for an unknown game,
    /// [`StoreError::InvalidState`] if the game is stopped.
    #[instrument(skip(self, board))]
    pub fn append_round(
        &self,
        id: &str,
        winner: Option<&str>,
        board: Option<BoardSnapshot>,
    ) -> Result<Game, StoreError> {
        let winner = winner
            .and_then(|w| RoundWinner::from_str(w).ok())
            .ok_or_else(|| {
                StoreError::Validation("winner must be player1, player2, or draw".to_string())
            })?;
        let board = board.unwrap_or_default();
        if !board.is_well_formed() {
            return Err(StoreError::Validation(
                "board must be empty or 3 rows of 3 cells".to_string(),
            ));
        }

        let mut game = self.get_game(id)?;
        if !game.status.is_active() {
            warn!(game_id = %id, status = %game.status, "Round rejected for inactive game");
            return Err(StoreError::InvalidState("Game already stopped".to_string()));
        }

        game.push_round(winner, board);
        let game = self.repository.save_rounds(&game)?.ok_or_else(|| {
            warn!(game_id = %id, "Game stopped before the round was saved");
            StoreError::InvalidState("Game already stopped".to_string())
        })?;
        info!(game_id = %game.id, winner = %winner, rounds = game.rounds.len(), "Round recorded");
        Ok(game)
    }

    /// Stops a game. Stopping a stopped game succeeds without changes.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] for an unknown game.
    #[instrument(skip(self))]
    pub fn stop_game(&self, id: &str) -> Result<Game, StoreError> {
        let mut game = self.get_game(id)?;
        if !game.stop() {
            debug!(game_id = %id, "Game already stopped");
            return Ok(game);
        }
        let game = self
            .repository
            .save_status(&game)?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        info!(game_id = %game.id, "Game stopped");
        Ok(game)
    }
}
