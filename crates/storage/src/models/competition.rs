use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{CompetitionCategory, CompetitionStatus, EntryDifficulty};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Competition {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub category: CompetitionCategory,
    pub start_date: NaiveDate,
    pub deadline: NaiveDate,
    pub prize_value: Decimal,
    pub entry_difficulty: EntryDifficulty,
    pub sponsor: String,
    pub entry_url: String,
    pub status: CompetitionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
}

impl Competition {
    pub fn is_active(&self) -> bool {
        self.status == CompetitionStatus::Active
    }
}
