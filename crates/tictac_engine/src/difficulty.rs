//! Per-move time limits.

use serde::{Deserialize, Serialize};

/// Difficulty level selecting how long each player has to move.
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
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Difficulty {
    /// Two minutes per move.
    Easy,
    /// One minute per move.
    Medium,
    /// Twenty seconds per move.
    Hard,
}

impl Difficulty {
    /// Seconds allowed per move.
    pub fn time_limit(self) -> u32 {
        match self {
            Difficulty::Easy => 120,
            Difficulty::Medium => 60,
            Difficulty::Hard => 20,
        }
    }
}
