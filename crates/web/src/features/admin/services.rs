use sqlx::PgPool;
use storage::{
    dto::competition::{CompetitionResponse, CreateCompetitionRequest, UpdateCompetitionRequest},
    error::Result,
    models::Competition,
    repository::competition::CompetitionRepository,
};
use uuid::Uuid;

/// Every competition, including archived ones
pub async fn list_all_competitions(pool: &PgPool) -> Result<Vec<CompetitionResponse>> {
    let repo = CompetitionRepository::new(pool);
    repo.list_all().await
}

/// Fetch the stored row a patch will be applied to
pub async fn find_competition(pool: &PgPool, id: Uuid) -> Result<Competition> {
    let repo = CompetitionRepository::new(pool);
    repo.find_by_id(id).await
}

/// Create a new competition
pub async fn create_competition(
    pool: &PgPool,
    request: &CreateCompetitionRequest,
    created_by: Option<Uuid>,
) -> Result<CompetitionResponse> {
    let repo = CompetitionRepository::new(pool);
    repo.create(request, created_by).await
}

/// Update a competition
pub async fn update_competition(
    pool: &PgPool,
    existing: &Competition,
    request: &UpdateCompetitionRequest,
) -> Result<CompetitionResponse> {
    let repo = CompetitionRepository::new(pool);
    repo.update(existing, request).await
}

/// Archive a competition
pub async fn archive_competition(pool: &PgPool, id: Uuid) -> Result<CompetitionResponse> {
    let repo = CompetitionRepository::new(pool);
    repo.archive(id).await
}

/// Delete a competition
pub async fn delete_competition(pool: &PgPool, id: Uuid) -> Result<()> {
    let repo = CompetitionRepository::new(pool);
    repo.delete(id).await
}
