use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// A viewer's bookmark on a competition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct SavedCompetition {
    pub id: Uuid,
    pub user_id: Uuid,
    pub competition_id: Uuid,
    pub created_at: DateTime<Utc>,
}
