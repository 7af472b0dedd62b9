use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::SavedCompetition;

/// Request header carrying the viewer UUID
pub const VIEWER_HEADER: &str = "x-viewer-id";

/// Identity of the viewer behind a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ViewerResponse {
    pub id: Uuid,
}

/// A viewer's save record for one competition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SavedCompetitionResponse {
    pub competition_id: Uuid,
    pub user_id: Uuid,
    pub saved_at: DateTime<Utc>,
}

impl From<SavedCompetition> for SavedCompetitionResponse {
    fn from(saved: SavedCompetition) -> Self {
        Self {
            competition_id: saved.competition_id,
            user_id: saved.user_id,
            saved_at: saved.created_at,
        }
    }
}
