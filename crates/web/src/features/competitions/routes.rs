use axum::{Router, routing::get};
use storage::Database;

use super::handlers::{get_competition, list_competitions};

pub fn routes() -> Router<Database> {
    Router::new()
        .route("/", get(list_competitions))
        .route("/:id", get(get_competition))
}
