//! Viewer identity carried by the `x-viewer-id` header.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::error::WebError;

pub use storage::dto::saved::VIEWER_HEADER;

/// The viewer behind a request, if one identified itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewer(pub Option<Uuid>);

/// A viewer that must be present; rejects anonymous requests with 401
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequireViewer(pub Uuid);

fn viewer_from_parts(parts: &Parts) -> Result<Option<Uuid>, WebError> {
    let Some(value) = parts.headers.get(VIEWER_HEADER) else {
        return Ok(None);
    };

    value
        .to_str()
        .ok()
        .and_then(|raw| Uuid::parse_str(raw.trim()).ok())
        .map(Some)
        .ok_or_else(|| WebError::BadRequest(format!("{VIEWER_HEADER} must be a UUID")))
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Viewer {
    type Rejection = WebError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        viewer_from_parts(parts).map(Viewer)
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for RequireViewer {
    type Rejection = WebError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        viewer_from_parts(parts)?
            .map(RequireViewer)
            .ok_or(WebError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
        routing::get,
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route(
                "/whoami",
                get(|Viewer(viewer): Viewer| async move {
                    viewer.map(|id| id.to_string()).unwrap_or_default()
                }),
            )
            .route(
                "/mine",
                get(|RequireViewer(id): RequireViewer| async move { id.to_string() }),
            )
    }

    async fn call(uri: &str, viewer: Option<&str>) -> (StatusCode, String) {
        let mut request = Request::builder().uri(uri);
        if let Some(value) = viewer {
            request = request.header(VIEWER_HEADER, value);
        }
        let response = app()
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_anonymous_viewer_is_none() {
        assert_eq!(call("/whoami", None).await, (StatusCode::OK, String::new()));
    }

    #[tokio::test]
    async fn test_viewer_header_is_parsed() {
        let id = Uuid::new_v4().to_string();
        assert_eq!(call("/whoami", Some(&id)).await, (StatusCode::OK, id.clone()));
        assert_eq!(call("/mine", Some(&id)).await, (StatusCode::OK, id));
    }

    #[tokio::test]
    async fn test_malformed_viewer_header_is_bad_request() {
        let (status, _) = call("/whoami", Some("not-a-uuid")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_required_viewer_rejects_anonymous() {
        let (status, _) = call("/mine", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
