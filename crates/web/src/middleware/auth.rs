use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use std::collections::HashSet;
use std::sync::Arc;

use crate::error::WebError;

/// Guard for the admin routes: requires `Authorization: Bearer <key>`
pub async fn require_auth(
    State(api_keys): State<ApiKeys>,
    request: Request,
    next: Next,
) -> Result<Response, WebError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    match token {
        Some(token) if api_keys.is_valid(token) => Ok(next.run(request).await),
        Some(_) => {
            tracing::warn!("Invalid API key attempt");
            Err(WebError::Unauthorized)
        }
        None => Err(WebError::Unauthorized),
    }
}

#[derive(Clone, Default)]
pub struct ApiKeys {
    keys: Arc<HashSet<String>>,
}

impl ApiKeys {
    pub fn from_comma_separated(keys_str: &str) -> Self {
        let keys = keys_str
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        Self {
            keys: Arc::new(keys),
        }
    }

    pub fn is_valid(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::StatusCode, middleware, routing::get};
    use tower::ServiceExt;

    fn app(keys: &str) -> Router {
        Router::new()
            .route("/admin", get(|| async { "ok" }))
            .route_layer(middleware::from_fn_with_state(
                ApiKeys::from_comma_separated(keys),
                require_auth,
            ))
    }

    async fn status_for(keys: &str, authorization: Option<&str>) -> StatusCode {
        let mut request = Request::builder().uri("/admin");
        if let Some(value) = authorization {
            request = request.header(AUTHORIZATION, value);
        }
        app(keys)
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[test]
    fn test_keys_are_trimmed_and_blank_entries_dropped() {
        let keys = ApiKeys::from_comma_separated(" alpha, ,beta ,");
        assert_eq!(keys.len(), 2);
        assert!(keys.is_valid("alpha"));
        assert!(keys.is_valid("beta"));
        assert!(!keys.is_valid(""));
    }

    #[tokio::test]
    async fn test_valid_key_passes() {
        assert_eq!(status_for("alpha", Some("Bearer alpha")).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_or_wrong_key_is_rejected() {
        assert_eq!(status_for("alpha", None).await, StatusCode::UNAUTHORIZED);
        assert_eq!(
            status_for("alpha", Some("Bearer beta")).await,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_for("alpha", Some("Basic alpha")).await,
            StatusCode::UNAUTHORIZED
        );
    }

    #[tokio::test]
    async fn test_no_configured_keys_rejects_everything() {
        assert_eq!(status_for("", Some("Bearer ")).await, StatusCode::UNAUTHORIZED);
    }
}
