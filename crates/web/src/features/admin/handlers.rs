use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::competition::{CompetitionResponse, CreateCompetitionRequest, UpdateCompetitionRequest},
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::middleware::viewer::Viewer;

use super::services;

#[utoipa::path(
    get,
    path = "/api/admin/competitions",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "All competitions, active and archived", body = Vec<CompetitionResponse>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "admin"
)]
pub async fn list_all_competitions(
    State(db): State<Database>,
) -> Result<Json<Vec<CompetitionResponse>>, WebError> {
    let competitions = services::list_all_competitions(db.pool()).await?;

    Ok(Json(competitions))
}

#[utoipa::path(
    post,
    path = "/api/admin/competitions",
    request_body = CreateCompetitionRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Competition created successfully", body = CompetitionResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "admin"
)]
pub async fn create_competition(
    State(db): State<Database>,
    Viewer(created_by): Viewer,
    Json(req): Json<CreateCompetitionRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    req.validate_dates()
        .map_err(|e| WebError::BadRequest(e.to_string()))?;

    let competition = services::create_competition(db.pool(), &req, created_by).await?;

    Ok((StatusCode::CREATED, Json(competition)).into_response())
}

#[utoipa::path(
    put,
    path = "/api/admin/competitions/{id}",
    params(
        ("id" = Uuid, Path, description = "Competition ID")
    ),
    request_body = UpdateCompetitionRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Competition updated successfully", body = CompetitionResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Competition not found")
    ),
    tag = "admin"
)]
pub async fn update_competition(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
    Json(update_req): Json<UpdateCompetitionRequest>,
) -> Result<Json<CompetitionResponse>, WebError> {
    update_req.validate()?;

    let existing = services::find_competition(db.pool(), id).await?;

    update_req
        .validate_dates(&existing)
        .map_err(|e| WebError::BadRequest(e.to_string()))?;

    let updated = services::update_competition(db.pool(), &existing, &update_req).await?;

    Ok(Json(updated))
}

#[utoipa::path(
    post,
    path = "/api/admin/competitions/{id}/archive",
    params(
        ("id" = Uuid, Path, description = "Competition ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Competition archived", body = CompetitionResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Competition not found")
    ),
    tag = "admin"
)]
pub async fn archive_competition(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Json<CompetitionResponse>, WebError> {
    let archived = services::archive_competition(db.pool(), id).await?;

    Ok(Json(archived))
}

#[utoipa::path(
    delete,
    path = "/api/admin/competitions/{id}",
    params(
        ("id" = Uuid, Path, description = "Competition ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Competition deleted successfully"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Competition not found")
    ),
    tag = "admin"
)]
pub async fn delete_competition(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    services::delete_competition(db.pool(), id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
