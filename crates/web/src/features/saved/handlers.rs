use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::saved::{SavedCompetitionResponse, ViewerResponse},
};
use uuid::Uuid;

use crate::error::WebError;
use crate::middleware::viewer::{RequireViewer, Viewer};

use super::services;

#[utoipa::path(
    get,
    path = "/api/session",
    params(
        ("x-viewer-id" = Option<String>, Header, description = "Viewer UUID")
    ),
    responses(
        (status = 200, description = "The current viewer, or null when anonymous", body = ViewerResponse)
    ),
    tag = "saved"
)]
pub async fn get_session(Viewer(viewer): Viewer) -> Json<Option<ViewerResponse>> {
    Json(viewer.map(|id| ViewerResponse { id }))
}

#[utoipa::path(
    get,
    path = "/api/saved/{competition_id}",
    params(
        ("competition_id" = Uuid, Path, description = "Competition ID"),
        ("x-viewer-id" = String, Header, description = "Viewer UUID")
    ),
    responses(
        (status = 200, description = "The viewer has saved this competition", body = SavedCompetitionResponse),
        (status = 401, description = "No viewer"),
        (status = 404, description = "Not saved")
    ),
    tag = "saved"
)]
pub async fn get_saved(
    State(db): State<Database>,
    RequireViewer(viewer): RequireViewer,
    Path(competition_id): Path<Uuid>,
) -> Result<Json<SavedCompetitionResponse>, WebError> {
    let saved = services::find_saved(db.pool(), viewer, competition_id)
        .await?
        .ok_or(WebError::NotFound)?;

    Ok(Json(SavedCompetitionResponse::from(saved)))
}

#[utoipa::path(
    put,
    path = "/api/saved/{competition_id}",
    params(
        ("competition_id" = Uuid, Path, description = "Competition ID"),
        ("x-viewer-id" = String, Header, description = "Viewer UUID")
    ),
    responses(
        (status = 200, description = "Competition saved", body = SavedCompetitionResponse),
        (status = 401, description = "No viewer"),
        (status = 404, description = "Competition not found")
    ),
    tag = "saved"
)]
pub async fn save_competition(
    State(db): State<Database>,
    RequireViewer(viewer): RequireViewer,
    Path(competition_id): Path<Uuid>,
) -> Result<Json<SavedCompetitionResponse>, WebError> {
    let saved = services::save_competition(db.pool(), viewer, competition_id).await?;

    Ok(Json(SavedCompetitionResponse::from(saved)))
}

#[utoipa::path(
    delete,
    path = "/api/saved/{competition_id}",
    params(
        ("competition_id" = Uuid, Path, description = "Competition ID"),
        ("x-viewer-id" = String, Header, description = "Viewer UUID")
    ),
    responses(
        (status = 204, description = "Save removed"),
        (status = 401, description = "No viewer"),
        (status = 404, description = "Not saved")
    ),
    tag = "saved"
)]
pub async fn unsave_competition(
    State(db): State<Database>,
    RequireViewer(viewer): RequireViewer,
    Path(competition_id): Path<Uuid>,
) -> Result<Response, WebError> {
    services::unsave_competition(db.pool(), viewer, competition_id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
