use sqlx::PgPool;
use storage::{
    dto::competition::CompetitionResponse, error::Result, filter::FilterOptions,
    repository::competition::CompetitionRepository,
};
use uuid::Uuid;

/// List active competitions matching the filters
pub async fn list_competitions(
    pool: &PgPool,
    filters: &FilterOptions,
    viewer: Option<Uuid>,
) -> Result<Vec<CompetitionResponse>> {
    let repo = CompetitionRepository::new(pool);
    repo.list_active(filters, viewer).await
}

/// Get a competition with its requirement and eligibility lists
pub async fn get_competition(
    pool: &PgPool,
    id: Uuid,
    viewer: Option<Uuid>,
) -> Result<CompetitionResponse> {
    let repo = CompetitionRepository::new(pool);
    repo.find_detailed(id, viewer).await
}
