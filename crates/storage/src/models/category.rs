use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "competition_category")]
pub enum CompetitionCategory {
    Sweepstakes,
    Contest,
    Giveaway,
    Promotion,
    Raffle,
}

impl CompetitionCategory {
    pub const ALL: [Self; 5] = [
        Self::Sweepstakes,
        Self::Contest,
        Self::Giveaway,
        Self::Promotion,
        Self::Raffle,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sweepstakes => "Sweepstakes",
            Self::Contest => "Contest",
            Self::Giveaway => "Giveaway",
            Self::Promotion => "Promotion",
            Self::Raffle => "Raffle",
        }
    }
}

impl fmt::Display for CompetitionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompetitionCategory {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseEnumError {
                kind: "category",
                value: s.to_string(),
            })
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "entry_difficulty")]
pub enum EntryDifficulty {
    Easy,
    Medium,
    Hard,
}

impl EntryDifficulty {
    pub const ALL: [Self; 3] = [Self::Easy, Self::Medium, Self::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }
}

impl fmt::Display for EntryDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryDifficulty {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseEnumError {
                kind: "difficulty",
                value: s.to_string(),
            })
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    sqlx::Type,
    ToSchema,
)]
#[sqlx(type_name = "competition_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CompetitionStatus {
    #[default]
    Active,
    Archived,
}

impl CompetitionStatus {
    /// Label shown in the admin table
    pub fn label(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Archived => "Archived",
        }
    }
}
