use axum::{Router, routing::get};
use storage::Database;

use super::handlers::{get_saved, save_competition, unsave_competition};

pub fn routes() -> Router<Database> {
    Router::new().route(
        "/:competition_id",
        get(get_saved).put(save_competition).delete(unsave_competition),
    )
}
