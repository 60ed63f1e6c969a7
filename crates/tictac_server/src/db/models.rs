//! Database row type for games.
//!
//! A game is stored as one row; its rounds live in the `rounds` column as a
//! JSON array, mirroring the document the API returns.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use diesel::prelude::*;
use std::str::FromStr;
use tictac_engine::GameStatus;
use tracing::instrument;

use crate::db::{DbError, DbErrorKind, schema};
use crate::game::{Game, Round};

/// Game row as stored in SQLite.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, Getters)]
#[diesel(table_name = schema::games)]
pub struct GameRecord {
    id: String,
    player1: String,
    player2: String,
    status: String,
    rounds: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl GameRecord {
    /// Encodes a game into its row form.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the round list cannot be serialized.
    #[instrument(skip(game), fields(game_id = %game.id))]
    pub fn from_game(game: &Game) -> Result<Self, DbError> {
        Ok(Self {
            id: game.id.clone(),
            player1: game.player1.clone(),
            player2: game.player2.clone(),
            status: game.status.as_ref().to_string(),
            rounds: serde_json::to_string(&game.rounds)?,
            created_at: game.created_at.naive_utc(),
            updated_at: game.updated_at.naive_utc(),
        })
    }

    /// Decodes the row back into a [`Game`].
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the status or the round document is corrupt.
    #[instrument(skip(self), fields(game_id = %self.id, status = %self.status))]
    pub fn into_game(self) -> Result<Game, DbError> {
        let status = GameStatus::from_str(&self.status).map_err(|_| {
            DbError::new(
                DbErrorKind::Corrupt,
                format!("Invalid status: '{}'", self.status),
            )
        })?;
        let rounds: Vec<Round> = serde_json::from_str(&self.rounds)?;

        Ok(Game {
            id: self.id,
            player1: self.player1,
            player2: self.player2,
            status,
            rounds,
            created_at: self.created_at.and_utc(),
            updated_at: self.updated_at.and_utc(),
        })
    }
}
