//! Game aggregate: a player pair and the rounds they have played.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tictac_engine::{BoardSnapshot, GameStatus, RoundWinner};
use tracing::instrument;
use uuid::Uuid;

/// One finished round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Round {
    /// Who won the round.
    pub winner: RoundWinner,
    /// Final board, or empty when none was submitted.
    #[serde(default)]
    pub board: BoardSnapshot,
    /// When the round was recorded.
    pub created_at: DateTime<Utc>,
    /// Rounds are never edited, so this equals `created_at`.
    pub updated_at: DateTime<Utc>,
}

/// A persisted game between two named players.
///
/// Serialized with `_id` and camelCase timestamps, the shape browser clients
/// already consume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    /// Opaque identifier.
    #[serde(rename = "_id")]
    pub id: String,
    /// Player holding X.
    pub player1: String,
    /// Player holding O.
    pub player2: String,
    /// Whether more rounds may be recorded.
    pub status: GameStatus,
    /// Rounds in play order.
    pub rounds: Vec<Round>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Time of the last change.
    pub updated_at: DateTime<Utc>,
}

/// Round counts per result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tally {
    /// Rounds won by player 1.
    pub player1: usize,
    /// Rounds won by player 2.
    pub player2: usize,
    /// Drawn rounds.
    pub draws: usize,
}

impl Game {
    /// Creates an active game with no rounds and a fresh id.
    #[instrument]
    pub fn new(player1: String, player2: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            player1,
            player2,
            status: GameStatus::Active,
            rounds: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Appends a round. Callers check the status gate first.
    #[instrument(skip(self, board), fields(game_id = %self.id))]
    pub fn push_round(&mut self, winner: RoundWinner, board: BoardSnapshot) {
        let now = Utc::now();
        self.rounds.push(Round {
            winner,
            board,
            created_at: now,
            updated_at: now,
        });
        self.updated_at = now;
    }

    /// Marks the game stopped. Returns false if it already was.
    #[instrument(skip(self), fields(game_id = %self.id))]
    pub fn stop(&mut self) -> bool {
        if self.status == GameStatus::Stopped {
            return false;
        }
        self.status = GameStatus::Stopped;
        self.updated_at = Utc::now();
        true
    }

    /// Counts wins and draws across all rounds.
    pub fn tally(&self) -> Tally {
        self.rounds
            .iter()
            .fold(Tally::default(), |mut tally, round| {
                match round.winner {
                    RoundWinner::Player1 => tally.player1 += 1,
                    RoundWinner::Player2 => tally.player2 += 1,
                    RoundWinner::Draw => tally.draws += 1,
                }
                tally
            })
    }
}
