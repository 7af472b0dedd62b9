use axum::{
    Json,
    extract::{Path, Query, State},
};
use storage::{
    Database,
    dto::competition::{CompetitionQuery, CompetitionResponse},
    filter::FilterOptions,
};
use uuid::Uuid;

use crate::error::WebError;
use crate::middleware::viewer::Viewer;

use super::services;

#[utoipa::path(
    get,
    path = "/api/competitions",
    params(
        CompetitionQuery,
        ("x-viewer-id" = Option<String>, Header, description = "Viewer UUID used for the saved flag")
    ),
    responses(
        (status = 200, description = "Active competitions matching every given filter", body = Vec<CompetitionResponse>),
        (status = 400, description = "Invalid filter")
    ),
    tag = "competitions"
)]
pub async fn list_competitions(
    State(db): State<Database>,
    Viewer(viewer): Viewer,
    Query(query): Query<CompetitionQuery>,
) -> Result<Json<Vec<CompetitionResponse>>, WebError> {
    let filters = FilterOptions::from(query);
    let competitions = services::list_competitions(db.pool(), &filters, viewer).await?;

    tracing::debug!(count = competitions.len(), "Listed competitions");

    Ok(Json(competitions))
}

#[utoipa::path(
    get,
    path = "/api/competitions/{id}",
    params(
        ("id" = Uuid, Path, description = "Competition ID"),
        ("x-viewer-id" = Option<String>, Header, description = "Viewer UUID used for the saved flag")
    ),
    responses(
        (status = 200, description = "Competition found", body = CompetitionResponse),
        (status = 404, description = "Competition not found")
    ),
    tag = "competitions"
)]
pub async fn get_competition(
    State(db): State<Database>,
    Viewer(viewer): Viewer,
    Path(id): Path<Uuid>,
) -> Result<Json<CompetitionResponse>, WebError> {
    let competition = services::get_competition(db.pool(), id, viewer).await?;

    Ok(Json(competition))
}
