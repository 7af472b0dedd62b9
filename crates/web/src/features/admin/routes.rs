use axum::{
    Router, middleware,
    routing::{get, post, put},
};
use storage::Database;

use super::handlers::{
    archive_competition, create_competition, delete_competition, list_all_competitions,
    update_competition,
};
use crate::middleware::auth::{ApiKeys, require_auth};

pub fn routes(api_keys: ApiKeys) -> Router<Database> {
    Router::new()
        .route("/", get(list_all_competitions).post(create_competition))
        .route("/:id", put(update_competition).delete(delete_competition))
        .route("/:id/archive", post(archive_competition))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth))
}
