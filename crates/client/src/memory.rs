//! In-memory data store used by the client tests.

use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use storage::dto::competition::{
    CompetitionResponse, CreateCompetitionRequest, UpdateCompetitionRequest,
};
use storage::filter::FilterOptions;
use storage::models::{Competition, CompetitionCategory, CompetitionStatus, EntryDifficulty};
use uuid::Uuid;

use crate::error::{ClientError, Result};
use crate::source::{AdminSource, CompetitionSource};

/// An active, easy-entry competition running through the first half of 2025
pub(crate) fn sample_competition(
    title: &str,
    category: CompetitionCategory,
    prize: i64,
) -> Competition {
    Competition {
        id: Uuid::new_v4(),
        title: title.to_string(),
        description: format!("{title} description"),
        image_url: "https://example.com/image.png".to_string(),
        category,
        start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        deadline: NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
        prize_value: Decimal::from(prize),
        entry_difficulty: EntryDifficulty::Easy,
        sponsor: "Acme".to_string(),
        entry_url: "https://example.com/enter".to_string(),
        status: CompetitionStatus::Active,
        created_at: Utc::now(),
        updated_at: Utc::now(),
        created_by: None,
    }
}

struct Stored {
    competition: Competition,
    requirements: Vec<String>,
    eligibility: Vec<String>,
}

#[derive(Default)]
struct Tables {
    competitions: Vec<Stored>,
    saves: HashSet<(Uuid, Uuid)>,
    delays: VecDeque<Duration>,
}

pub(crate) struct InMemoryStore {
    viewer: Option<Uuid>,
    tables: Mutex<Tables>,
    fail_listing: AtomicBool,
    listing_calls: AtomicUsize,
    mutations: AtomicUsize,
}

impl InMemoryStore {
    pub(crate) fn new(viewer: Option<Uuid>) -> Self {
        Self {
            viewer,
            tables: Mutex::new(Tables::default()),
            fail_listing: AtomicBool::new(false),
            listing_calls: AtomicUsize::new(0),
            mutations: AtomicUsize::new(0),
        }
    }

    pub(crate) fn add(&self, competition: Competition) -> Uuid {
        self.add_with_lines(competition, Vec::new(), Vec::new())
    }

    pub(crate) fn add_with_lines(
        &self,
        competition: Competition,
        requirements: Vec<String>,
        eligibility: Vec<String>,
    ) -> Uuid {
        let id = competition.id;
        self.tables.lock().unwrap().competitions.push(Stored {
            competition,
            requirements,
            eligibility,
        });
        id
    }

    /// Make every listing call fail until switched back off
    pub(crate) fn fail_listing(&self, fail: bool) {
        self.fail_listing.store(fail, Ordering::SeqCst);
    }

    /// Hold the next listing response back for `delay`
    pub(crate) fn delay_next_listing(&self, delay: Duration) {
        self.tables.lock().unwrap().delays.push_back(delay);
    }

    pub(crate) fn listing_calls(&self) -> usize {
        self.listing_calls.load(Ordering::SeqCst)
    }

    /// Successful writes to saved competitions
    pub(crate) fn mutations(&self) -> usize {
        self.mutations.load(Ordering::SeqCst)
    }

    pub(crate) fn status_of(&self, id: Uuid) -> Option<CompetitionStatus> {
        self.tables
            .lock()
            .unwrap()
            .competitions
            .iter()
            .find(|s| s.competition.id == id)
            .map(|s| s.competition.status)
    }

    fn respond(tables: &Tables, stored: &Stored, viewer: Option<Uuid>) -> CompetitionResponse {
        let is_saved = viewer
            .is_some_and(|v| tables.saves.contains(&(v, stored.competition.id)));
        CompetitionResponse::from_parts(
            stored.competition.clone(),
            stored.requirements.clone(),
            stored.eligibility.clone(),
            is_saved,
        )
    }

    fn find_response(&self, id: Uuid) -> Result<CompetitionResponse> {
        let tables = self.tables.lock().unwrap();
        tables
            .competitions
            .iter()
            .find(|s| s.competition.id == id)
            .map(|stored| Self::respond(&tables, stored, self.viewer))
            .ok_or(ClientError::NotFound)
    }
}

#[async_trait::async_trait]
impl CompetitionSource for InMemoryStore {
    async fn current_viewer(&self) -> Result<Option<Uuid>> {
        Ok(self.viewer)
    }

    async fn list_active(
        &self,
        filters: &FilterOptions,
        viewer: Option<Uuid>,
    ) -> Result<Vec<CompetitionResponse>> {
        self.listing_calls.fetch_add(1, Ordering::SeqCst);

        let delay = self.tables.lock().unwrap().delays.pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail_listing.load(Ordering::SeqCst) {
            return Err(ClientError::ApiError {
                status: 500,
                message: "An internal error occurred".to_string(),
            });
        }

        let tables = self.tables.lock().unwrap();
        let mut selected: Vec<&Stored> = tables
            .competitions
            .iter()
            .filter(|s| filters.selects(&s.competition))
            .collect();
        selected.sort_by(|a, b| {
            a.competition
                .deadline
                .cmp(&b.competition.deadline)
                .then(b.competition.created_at.cmp(&a.competition.created_at))
        });

        Ok(selected
            .into_iter()
            .map(|stored| Self::respond(&tables, stored, viewer))
            .collect())
    }

    async fn is_saved(&self, viewer: Uuid, competition_id: Uuid) -> Result<bool> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .saves
            .contains(&(viewer, competition_id)))
    }

    async fn insert_saved(&self, viewer: Uuid, competition_id: Uuid) -> Result<()> {
        let mut tables = self.tables.lock().unwrap();
        if !tables
            .competitions
            .iter()
            .any(|s| s.competition.id == competition_id)
        {
            return Err(ClientError::NotFound);
        }
        tables.saves.insert((viewer, competition_id));
        self.mutations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn delete_saved(&self, viewer: Uuid, competition_id: Uuid) -> Result<()> {
        if !self
            .tables
            .lock()
            .unwrap()
            .saves
            .remove(&(viewer, competition_id))
        {
            return Err(ClientError::NotFound);
        }
        self.mutations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait::async_trait]
impl AdminSource for InMemoryStore {
    async fn list_all(&self) -> Result<Vec<CompetitionResponse>> {
        let tables = self.tables.lock().unwrap();
        let mut all: Vec<&Stored> = tables.competitions.iter().collect();
        all.sort_by(|a, b| b.competition.created_at.cmp(&a.competition.created_at));

        Ok(all
            .into_iter()
            .map(|stored| Self::respond(&tables, stored, self.viewer))
            .collect())
    }

    async fn create(&self, draft: &CreateCompetitionRequest) -> Result<CompetitionResponse> {
        let now = Utc::now();
        let competition = Competition {
            id: Uuid::new_v4(),
            title: draft.title.clone(),
            description: draft.description.clone(),
            image_url: draft.image_url.clone(),
            category: draft.category,
            start_date: draft.start_date,
            deadline: draft.deadline,
            prize_value: draft.prize_value,
            entry_difficulty: draft.entry_difficulty,
            sponsor: draft.sponsor.clone(),
            entry_url: draft.entry_url.clone(),
            status: CompetitionStatus::Active,
            created_at: now,
            updated_at: now,
            created_by: self.viewer,
        };
        let id = self.add_with_lines(
            competition,
            draft.requirements.clone(),
            draft.eligibility.clone(),
        );
        self.find_response(id)
    }

    async fn update(
        &self,
        id: Uuid,
        patch: &UpdateCompetitionRequest,
    ) -> Result<CompetitionResponse> {
        {
            let mut tables = self.tables.lock().unwrap();
            let stored = tables
                .competitions
                .iter_mut()
                .find(|s| s.competition.id == id)
                .ok_or(ClientError::NotFound)?;

            patch
                .validate_dates(&stored.competition)
                .map_err(|msg| ClientError::ApiError {
                    status: 400,
                    message: msg.to_string(),
                })?;

            let c = &mut stored.competition;
            if let Some(title) = &patch.title {
                c.title = title.clone();
            }
            if let Some(description) = &patch.description {
                c.description = description.clone();
            }
            if let Some(image_url) = &patch.image_url {
                c.image_url = image_url.clone();
            }
            if let Some(category) = patch.category {
                c.category = category;
            }
            if let Some(start_date) = patch.start_date {
                c.start_date = start_date;
            }
            if let Some(deadline) = patch.deadline {
                c.deadline = deadline;
            }
            if let Some(prize_value) = patch.prize_value {
                c.prize_value = prize_value;
            }
            if let Some(difficulty) = patch.entry_difficulty {
                c.entry_difficulty = difficulty;
            }
            if let Some(sponsor) = &patch.sponsor {
                c.sponsor = sponsor.clone();
            }
            if let Some(entry_url) = &patch.entry_url {
                c.entry_url = entry_url.clone();
            }
            if let Some(status) = patch.status {
                c.status = status;
            }
            c.updated_at = Utc::now();

            if let Some(requirements) = &patch.requirements {
                stored.requirements = requirements.clone();
            }
            if let Some(eligibility) = &patch.eligibility {
                stored.eligibility = eligibility.clone();
            }
        }
        self.find_response(id)
    }

    async fn archive(&self, id: Uuid) -> Result<CompetitionResponse> {
        self.update(
            id,
            &UpdateCompetitionRequest {
                status: Some(CompetitionStatus::Archived),
                ..Default::default()
            },
        )
        .await
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.competitions.len();
        tables.competitions.retain(|s| s.competition.id != id);
        if tables.competitions.len() == before {
            return Err(ClientError::NotFound);
        }
        tables.saves.retain(|(_, competition_id)| *competition_id != id);
        Ok(())
    }
}
