//! Outcome and status vocabulary shared by the engine and the game store.

use crate::Mark;
use serde::{Deserialize, Serialize};

/// Status of a persisted game. Only active games accept new rounds.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GameStatus {
    /// Rounds may be played and recorded.
    #[default]
    Active,
    /// The game is closed; no further rounds.
    Stopped,
}

impl GameStatus {
    /// True for [`GameStatus::Active`].
    pub fn is_active(self) -> bool {
        self == GameStatus::Active
    }
}

/// Winner of a recorded round, from the game record's point of view.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RoundWinner {
    /// The player holding X.
    Player1,
    /// The player holding O.
    Player2,
    /// Nobody won.
    Draw,
}

/// Terminal result of a round on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Outcome {
    /// Three in a row for the given mark.
    #[display("{} wins", _0)]
    Won(Mark),
    /// Full board or expired countdown.
    #[display("draw")]
    Draw,
}

impl From<Outcome> for RoundWinner {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Won(Mark::X) => RoundWinner::Player1,
            Outcome::Won(Mark::O) => RoundWinner::Player2,
            Outcome::Draw => RoundWinner::Draw,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_round_winner_strings() {
        assert_eq!(RoundWinner::from_str("player1").unwrap(), RoundWinner::Player1);
        assert_eq!(RoundWinner::from_str("draw").unwrap(), RoundWinner::Draw);
        assert!(RoundWinner::from_str("player3").is_err());
        assert!(RoundWinner::from_str("").is_err());
        assert_eq!(
            serde_json::to_string(&RoundWinner::Player2).unwrap(),
            r#""player2""#
        );
    }

    #[test]
    fn test_status_strings() {
        assert_eq!(GameStatus::Stopped.as_ref(), "stopped");
        assert_eq!(GameStatus::from_str("active").unwrap(), GameStatus::Active);
        assert_eq!(GameStatus::default(), GameStatus::Active);
    }

    #[test]
    fn test_outcome_maps_to_player_slot() {
        assert_eq!(RoundWinner::from(Outcome::Won(Mark::X)), RoundWinner::Player1);
        assert_eq!(RoundWinner::from(Outcome::Won(Mark::O)), RoundWinner::Player2);
        assert_eq!(RoundWinner::from(Outcome::Draw), RoundWinner::Draw);
    }
}
