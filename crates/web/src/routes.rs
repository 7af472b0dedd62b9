use axum::{Router, routing::get};
use storage::Database;
use tower_http::cors::{Any, CorsLayer};

use crate::features::{admin, competitions, saved};
use crate::middleware::auth::ApiKeys;

async fn health() -> &'static str {
    "ok"
}

/// All API routes, bound to the database state
pub fn api_router(db: Database, api_keys: ApiKeys) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(3600));

    Router::new()
        .route("/health", get(health))
        .route("/api/session", get(saved::handlers::get_session))
        .nest("/api/competitions", competitions::routes::routes())
        .nest("/api/saved", saved::routes::routes())
        .nest("/api/admin/competitions", admin::routes::routes(api_keys))
        .layer(cors)
        .with_state(db)
}
