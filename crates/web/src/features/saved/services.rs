use sqlx::PgPool;
use storage::{
    error::Result, models::SavedCompetition,
    repository::saved_competition::SavedCompetitionRepository,
};
use uuid::Uuid;

/// Look up the viewer's save record for a competition
pub async fn find_saved(
    pool: &PgPool,
    viewer: Uuid,
    competition_id: Uuid,
) -> Result<Option<SavedCompetition>> {
    let repo = SavedCompetitionRepository::new(pool);
    repo.find(viewer, competition_id).await
}

/// Record a save for the viewer
pub async fn save_competition(
    pool: &PgPool,
    viewer: Uuid,
    competition_id: Uuid,
) -> Result<SavedCompetition> {
    let repo = SavedCompetitionRepository::new(pool);
    repo.insert(viewer, competition_id).await
}

/// Drop the viewer's save record
pub async fn unsave_competition(pool: &PgPool, viewer: Uuid, competition_id: Uuid) -> Result<()> {
    let repo = SavedCompetitionRepository::new(pool);
    repo.delete(viewer, competition_id).await
}
