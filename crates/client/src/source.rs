//! Seams between the client state and the data store behind it.

use storage::dto::competition::{
    CompetitionResponse, CreateCompetitionRequest, UpdateCompetitionRequest,
};
use storage::filter::FilterOptions;
use uuid::Uuid;

use crate::Result;

/// Read access to the listing plus the per-viewer save relation
#[async_trait::async_trait]
pub trait CompetitionSource: Send + Sync {
    /// Identity of the viewer this source acts for, if any
    async fn current_viewer(&self) -> Result<Option<Uuid>>;

    async fn list_active(
        &self,
        filters: &FilterOptions,
        viewer: Option<Uuid>,
    ) -> Result<Vec<CompetitionResponse>>;

    async fn is_saved(&self, viewer: Uuid, competition_id: Uuid) -> Result<bool>;

    async fn insert_saved(&self, viewer: Uuid, competition_id: Uuid) -> Result<()>;

    async fn delete_saved(&self, viewer: Uuid, competition_id: Uuid) -> Result<()>;
}

/// Privileged competition management
#[async_trait::async_trait]
pub trait AdminSource: Send + Sync {
    async fn list_all(&self) -> Result<Vec<CompetitionResponse>>;

    async fn create(&self, draft: &CreateCompetitionRequest) -> Result<CompetitionResponse>;

    async fn update(
        &self,
        id: Uuid,
        patch: &UpdateCompetitionRequest,
    ) -> Result<CompetitionResponse>;

    async fn archive(&self, id: Uuid) -> Result<CompetitionResponse>;

    async fn delete(&self, id: Uuid) -> Result<()>;
}
