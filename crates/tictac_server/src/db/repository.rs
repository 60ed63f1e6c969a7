//! Database repository for game records.

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tictac_engine::GameStatus;
use tracing::{debug, info, instrument};

use crate::db::{DbError, DbErrorKind, GameRecord, schema};
use crate::game::Game;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Database repository for game records.
///
/// Every call opens its own SQLite connection, so the repository is cheap to
/// clone and safe to hand to blocking worker threads.
#[derive(Debug, Clone)]
pub struct GameRepository {
    database_url: String,
}

impl GameRepository {
    /// Creates a repository for the database at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the path is empty.
    #[instrument(skip(database_url), fields(database_url = %database_url))]
    pub fn new(database_url: String) -> Result<Self, DbError> {
        if database_url.trim().is_empty() {
            return Err(DbError::new(
                DbErrorKind::Config,
                "Database URL must not be empty",
            ));
        }
        info!(path = %database_url, "Creating GameRepository");
        Ok(Self { database_url })
    }

    /// Path of the backing database.
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    /// Establishes a database connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.database_url, "Establishing connection");
        let mut conn = SqliteConnection::establish(&self.database_url).map_err(|e| {
            DbError::new(
                DbErrorKind::Connection,
                format!("Failed to connect to '{}': {}", self.database_url, e),
            )
        })?;
        conn.batch_execute("PRAGMA busy_timeout = 5000;")?;
        Ok(conn)
    }

    /// Applies any pending schema migrations. Returns how many ran.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a migration fails.
    #[instrument(skip(self))]
    pub fn run_migrations(&self) -> Result<usize, DbError> {
        let mut conn = self.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| DbError::new(DbErrorKind::Migration, e.to_string()))?;
        info!(count = applied.len(), "Migrations applied");
        Ok(applied.len())
    }

    /// Inserts a new game.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the id already exists or a database error occurs.
    #[instrument(skip(self, game), fields(game_id = %game.id))]
    pub fn insert_game(&self, game: &Game) -> Result<Game, DbError> {
        debug!("Inserting game");
        let mut conn = self.connection()?;
        let record = GameRecord::from_game(game)?;

        let stored = diesel::insert_into(schema::games::table)
            .values(&record)
            .returning(GameRecord::as_returning())
            .get_result(&mut conn)?;

        info!(game_id = %stored.id(), "Game inserted");
        stored.into_game()
    }

    /// Lists all games, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs or a row is corrupt.
    #[instrument(skip(self))]
    pub fn list_games(&self) -> Result<Vec<Game>, DbError> {
        debug!("Listing games");
        let mut conn = self.connection()?;

        let records = schema::games::table
            .order(schema::games::created_at.desc())
            .select(GameRecord::as_select())
            .load(&mut conn)?;

        info!(count = records.len(), "Games loaded");
        records.into_iter().map(GameRecord::into_game).collect()
    }

    /// Gets a game by id. Returns `None` if not found.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs or the row is corrupt.
    #[instrument(skip(self))]
    pub fn find_game(&self, id: &str) -> Result<Option<Game>, DbError> {
        debug!("Looking up game");
        let mut conn = self.connection()?;

        let record = schema::games::table
            .find(id)
            .select(GameRecord::as_select())
            .first(&mut conn)
            .optional()?;

        match record {
            Some(record) => record.into_game().map(Some),
            None => {
                debug!("Game not found");
                Ok(None)
            }
        }
    }

    /// Writes a game's rounds and update time, but only while the stored game
    /// is still active. Returns `None` if no active row has the game's id.
    ///
    /// The status column is never written here, so a stop that lands between
    /// reading the game and saving its new round is kept.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self, game), fields(game_id = %game.id, rounds = game.rounds.len()))]
    pub fn save_rounds(&self, game: &Game) -> Result<Option<Game>, DbError> {
        use crate::db::schema::games::dsl;

        debug!("Saving rounds");
        let mut conn = self.connection()?;
        let record = GameRecord::from_game(game)?;

        let active = GameStatus::Active.to_string();
        let target = dsl::games
            .filter(dsl::id.eq(record.id().as_str()))
            .filter(dsl::status.eq(active.as_str()));
        let stored = diesel::update(target)
            .set((
                dsl::rounds.eq(record.rounds().as_str()),
                dsl::updated_at.eq(*record.updated_at()),
            ))
            .returning(GameRecord::as_returning())
            .get_result(&mut conn)
            .optional()?;

        match stored {
            Some(stored) => {
                info!("Rounds saved");
                stored.into_game().map(Some)
            }
            None => Ok(None),
        }
    }

    /// Writes a game's status and update time, leaving its rounds untouched.
    /// Returns `None` if no row has the game's id.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self, game), fields(game_id = %game.id, status = %game.status))]
    pub fn save_status(&self, game: &Game) -> Result<Option<Game>, DbError> {
        use crate::db::schema::games::dsl;

        debug!("Saving status");
        let mut conn = self.connection()?;
        let record = GameRecord::from_game(game)?;

        let stored = diesel::update(dsl::games.filter(dsl::id.eq(record.id().as_str())))
            .set((
                dsl::status.eq(record.status().as_str()),
                dsl::updated_at.eq(*record.updated_at()),
            ))
            .returning(GameRecord::as_returning())
            .get_result(&mut conn)
            .optional()?;

        match stored {
            Some(stored) => {
                info!("Status saved");
                stored.into_game().map(Some)
            }
            None => Ok(None),
        }
    }
}
