//! Client-side state of the competition listing.
//!
//! [`CompetitionFeed`] owns the applied filters and the last loaded result
//! set. Every fetch takes a generation number; only the response of the most
//! recently issued fetch is allowed to change the state, so a slow response
//! to an older filter can never overwrite a newer one.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use storage::dto::competition::CompetitionResponse;
use storage::filter::FilterOptions;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::Result;
use crate::session::Session;
use crate::source::CompetitionSource;

/// Message shown whenever the listing cannot be loaded
pub const LOAD_ERROR_MESSAGE: &str = "Failed to load competitions";

/// Everything a view needs to render the listing
#[derive(Debug, Clone, PartialEq)]
pub struct FeedSnapshot {
    pub competitions: Vec<CompetitionResponse>,
    pub loading: bool,
    pub error: Option<String>,
    pub filters: FilterOptions,
}

impl Default for FeedSnapshot {
    fn default() -> Self {
        Self {
            competitions: Vec::new(),
            loading: true,
            error: None,
            filters: FilterOptions::default(),
        }
    }
}

pub struct CompetitionFeed<S: ?Sized> {
    session: Session,
    state: RwLock<FeedSnapshot>,
    generation: AtomicU64,
    source: Arc<S>,
}

impl<S: CompetitionSource + ?Sized> CompetitionFeed<S> {
    /// A feed that has not loaded anything yet (`loading` is true until the first fetch)
    pub fn new(source: Arc<S>, session: Session) -> Self {
        Self {
            session,
            state: RwLock::new(FeedSnapshot::default()),
            generation: AtomicU64::new(0),
            source,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub async fn snapshot(&self) -> FeedSnapshot {
        self.state.read().await.clone()
    }

    pub async fn filters(&self) -> FilterOptions {
        self.state.read().await.filters.clone()
    }

    /// Replace the applied filters and reload
    pub async fn set_filters(&self, filters: FilterOptions) {
        self.state.write().await.filters = filters;
        self.fetch().await;
    }

    /// Reload with the current filters
    pub async fn refetch(&self) {
        self.fetch().await;
    }

    /// Load active competitions matching the applied filters.
    ///
    /// On failure the list is cleared and `error` carries [`LOAD_ERROR_MESSAGE`].
    pub async fn fetch(&self) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let filters = {
            let mut state = self.state.write().await;
            state.loading = true;
            state.filters.clone()
        };

        let result = self
            .source
            .list_active(&filters, self.session.viewer())
            .await;

        let mut state = self.state.write().await;

        if generation != self.generation.load(Ordering::SeqCst) {
            tracing::debug!(generation, "Discarding response of a superseded fetch");
            return;
        }

        match result {
            Ok(competitions) => {
                tracing::debug!(count = competitions.len(), "Competitions loaded");
                state.competitions = competitions;
                state.error = None;
            }
            Err(e) => {
                tracing::error!("Error fetching competitions: {}", e);
                state.competitions.clear();
                state.error = Some(LOAD_ERROR_MESSAGE.to_string());
            }
        }
        state.loading = false;
    }

    /// Flip the viewer's saved flag on a competition, then reload.
    ///
    /// Returns `Ok(None)` without touching the store when there is no viewer,
    /// otherwise the new saved state.
    pub async fn toggle_saved(&self, competition_id: Uuid) -> Result<Option<bool>> {
        let Some(viewer) = self.session.viewer() else {
            tracing::debug!(%competition_id, "Ignoring save toggle without a viewer");
            return Ok(None);
        };

        let outcome = self.flip_saved(viewer, competition_id).await;

        self.fetch().await;

        outcome.map(Some)
    }

    async fn flip_saved(&self, viewer: Uuid, competition_id: Uuid) -> Result<bool> {
        if self.source.is_saved(viewer, competition_id).await? {
            self.source.delete_saved(viewer, competition_id).await?;
            Ok(false)
        } else {
            self.source.insert_saved(viewer, competition_id).await?;
            Ok(true)
        }
    }
}
