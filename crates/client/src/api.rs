use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use storage::dto::competition::{
    CompetitionQuery, CompetitionResponse, CreateCompetitionRequest, UpdateCompetitionRequest,
};
use storage::dto::saved::{VIEWER_HEADER, ViewerResponse};
use storage::filter::FilterOptions;
use uuid::Uuid;

use crate::error::{ClientError, Result};
use crate::source::{AdminSource, CompetitionSource};

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// HTTP client for the competition API
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
    viewer: Option<Uuid>,
    admin_key: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::builder()
                .user_agent(concat!("prizeboard/", env!("CARGO_PKG_VERSION")))
                .build()?,
            viewer: None,
            admin_key: None,
        })
    }

    /// Identify requests as coming from `viewer`
    pub fn with_viewer(mut self, viewer: Option<Uuid>) -> Self {
        self.viewer = viewer;
        self
    }

    /// Bearer key sent on admin routes
    pub fn with_admin_key(mut self, admin_key: Option<String>) -> Self {
        self.admin_key = admin_key;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn as_viewer(&self, request: RequestBuilder, viewer: Option<Uuid>) -> RequestBuilder {
        match viewer {
            Some(id) => request.header(VIEWER_HEADER, id.to_string()),
            None => request,
        }
    }

    fn as_admin(&self, request: RequestBuilder) -> RequestBuilder {
        let request = self.as_viewer(request, self.viewer);
        match &self.admin_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        tracing::debug!(status = status.as_u16(), url = %response.url(), "API request failed");

        match status {
            StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized),
            StatusCode::NOT_FOUND => Err(ClientError::NotFound),
            _ => {
                let message = response
                    .json::<ErrorBody>()
                    .await
                    .map(|body| body.error)
                    .unwrap_or_else(|_| status.to_string());
                Err(ClientError::ApiError {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }
}

#[async_trait::async_trait]
impl CompetitionSource for ApiClient {
    async fn current_viewer(&self) -> Result<Option<Uuid>> {
        let request = self.as_viewer(self.client.get(self.url("/api/session")), self.viewer);
        let session = self
            .send(request)
            .await?
            .json::<Option<ViewerResponse>>()
            .await?;

        Ok(session.map(|viewer| viewer.id))
    }

    async fn list_active(
        &self,
        filters: &FilterOptions,
        viewer: Option<Uuid>,
    ) -> Result<Vec<CompetitionResponse>> {
        let request = self
            .client
            .get(self.url("/api/competitions"))
            .query(&CompetitionQuery::from(filters));
        let request = self.as_viewer(request, viewer);

        Ok(self.send(request).await?.json().await?)
    }

    async fn is_saved(&self, viewer: Uuid, competition_id: Uuid) -> Result<bool> {
        let request = self.client.get(self.url(&format!("/api/saved/{competition_id}")));

        match self.send(self.as_viewer(request, Some(viewer))).await {
            Ok(_) => Ok(true),
            Err(ClientError::NotFound) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn insert_saved(&self, viewer: Uuid, competition_id: Uuid) -> Result<()> {
        let request = self.client.put(self.url(&format!("/api/saved/{competition_id}")));
        self.send(self.as_viewer(request, Some(viewer))).await?;
        Ok(())
    }

    async fn delete_saved(&self, viewer: Uuid, competition_id: Uuid) -> Result<()> {
        let request = self
            .client
            .delete(self.url(&format!("/api/saved/{competition_id}")));
        self.send(self.as_viewer(request, Some(viewer))).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl AdminSource for ApiClient {
    async fn list_all(&self) -> Result<Vec<CompetitionResponse>> {
        let request = self.as_admin(self.client.get(self.url("/api/admin/competitions")));
        Ok(self.send(request).await?.json().await?)
    }

    async fn create(&self, draft: &CreateCompetitionRequest) -> Result<CompetitionResponse> {
        let request = self
            .as_admin(self.client.post(self.url("/api/admin/competitions")))
            .json(draft);
        Ok(self.send(request).await?.json().await?)
    }

    async fn update(
        &self,
        id: Uuid,
        patch: &UpdateCompetitionRequest,
    ) -> Result<CompetitionResponse> {
        let request = self
            .as_admin(self.client.put(self.url(&format!("/api/admin/competitions/{id}"))))
            .json(patch);
        Ok(self.send(request).await?.json().await?)
    }

    async fn archive(&self, id: Uuid) -> Result<CompetitionResponse> {
        let request = self.as_admin(
            self.client
                .post(self.url(&format!("/api/admin/competitions/{id}/archive"))),
        );
        Ok(self.send(request).await?.json().await?)
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let request = self.as_admin(
            self.client
                .delete(self.url(&format!("/api/admin/competitions/{id}"))),
        );
        self.send(request).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Json, Router,
        extract::Path,
        http::{HeaderMap, StatusCode as HttpStatus},
        routing::get,
    };
    use serde_json::{Value, json};

    const VIEWER: Uuid = Uuid::from_u128(0x5eed);
    const SAVED: Uuid = Uuid::from_u128(0xc0ffee);

    fn viewer_of(headers: &HeaderMap) -> Option<Uuid> {
        headers
            .get(VIEWER_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|raw| Uuid::parse_str(raw).ok())
    }

    async fn session(headers: HeaderMap) -> Json<Value> {
        Json(match viewer_of(&headers) {
            Some(id) => json!({ "id": id }),
            None => Value::Null,
        })
    }

    async fn saved_lookup(
        Path(competition_id): Path<Uuid>,
        headers: HeaderMap,
    ) -> (HttpStatus, Json<Value>) {
        if viewer_of(&headers) == Some(VIEWER) && competition_id == SAVED {
            (
                HttpStatus::OK,
                Json(json!({ "competition_id": SAVED, "user_id": VIEWER })),
            )
        } else {
            (
                HttpStatus::NOT_FOUND,
                Json(json!({ "error": "Resource not found" })),
            )
        }
    }

    /// Serves a canned API on a random local port
    async fn serve() -> ApiClient {
        let app = Router::new()
            .route("/api/session", get(session))
            .route(
                "/api/competitions",
                get(|| async {
                    (
                        HttpStatus::BAD_REQUEST,
                        Json(json!({ "error": "Failed to deserialize query string" })),
                    )
                }),
            )
            .route(
                "/api/saved/:competition_id",
                get(saved_lookup).put(|| async { (HttpStatus::INTERNAL_SERVER_ERROR, "boom") }),
            )
            .route(
                "/api/admin/competitions",
                get(|| async {
                    (
                        HttpStatus::UNAUTHORIZED,
                        Json(json!({ "error": "Unauthorized" })),
                    )
                }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        ApiClient {
            base_url: format!("http://{addr}"),
            client: reqwest::Client::builder().no_proxy().build().unwrap(),
            viewer: Some(VIEWER),
            admin_key: None,
        }
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:8080/").unwrap();
        assert_eq!(
            client.url("/api/competitions"),
            "http://localhost:8080/api/competitions"
        );
    }

    #[test]
    fn test_viewer_header_is_attached() {
        let viewer = Uuid::new_v4();
        let client = ApiClient::new("http://localhost:8080").unwrap();
        let request = client
            .as_viewer(client.client.get(client.url("/api/session")), Some(viewer))
            .build()
            .unwrap();
        assert_eq!(
            request.headers().get(VIEWER_HEADER).unwrap(),
            viewer.to_string().as_str()
        );
    }

    #[test]
    fn test_admin_requests_carry_bearer_key() {
        let client = ApiClient::new("http://localhost:8080")
            .unwrap()
            .with_admin_key(Some("secret".to_string()));
        let request = client
            .as_admin(client.client.get(client.url("/api/admin/competitions")))
            .build()
            .unwrap();
        assert_eq!(
            request.headers().get(reqwest::header::AUTHORIZATION).unwrap(),
            "Bearer secret"
        );
    }

    #[test]
    fn test_listing_query_string() {
        let client = ApiClient::new("http://localhost:8080").unwrap();
        let filters = FilterOptions {
            search: "win big".to_string(),
            ..Default::default()
        };
        let request = client
            .client
            .get(client.url("/api/competitions"))
            .query(&CompetitionQuery::from(&filters))
            .build()
            .unwrap();
        assert_eq!(request.url().query(), Some("search=win+big"));
    }

    #[tokio::test]
    async fn test_is_saved_reads_status() {
        let api = serve().await;
        assert!(api.is_saved(VIEWER, SAVED).await.unwrap());
        assert!(!api.is_saved(VIEWER, Uuid::new_v4()).await.unwrap());
        assert!(!api.is_saved(Uuid::new_v4(), SAVED).await.unwrap());
    }

    #[tokio::test]
    async fn test_current_viewer_comes_from_session() {
        let api = serve().await;
        assert_eq!(api.current_viewer().await.unwrap(), Some(VIEWER));

        let anonymous = serve().await.with_viewer(None);
        assert_eq!(anonymous.current_viewer().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_unauthorized_status_maps_to_unauthorized() {
        let api = serve().await;
        assert!(matches!(
            api.list_all().await,
            Err(ClientError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn test_error_body_message_is_kept() {
        let api = serve().await;
        match api.list_active(&FilterOptions::default(), None).await {
            Err(ClientError::ApiError { status, message }) => {
                assert_eq!(status, 400);
                assert_eq!(message, "Failed to deserialize query string");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_json_error_falls_back_to_status_text() {
        let api = serve().await;
        match api.insert_saved(VIEWER, SAVED).await {
            Err(ClientError::ApiError { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "500 Internal Server Error");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
