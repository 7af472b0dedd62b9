//! Competition management: the admin table and its add/edit form.
//!
//! Every operation waits for the data store to confirm and then reloads the
//! table. Nothing is changed locally ahead of the server.

use std::path::Path;
use std::sync::Arc;

use chrono::{Days, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use storage::dto::competition::{
    CompetitionResponse, CreateCompetitionRequest, UpdateCompetitionRequest,
};
use storage::models::{CompetitionCategory, EntryDifficulty};
use uuid::Uuid;
use validator::Validate;

use crate::error::{ClientError, Result};
use crate::listing::{format_deadline, format_prize};
use crate::session::Session;
use crate::source::AdminSource;

/// One line of the admin table
#[derive(Debug, Clone, PartialEq)]
pub struct AdminRow {
    pub id: Uuid,
    pub title: String,
    pub category: String,
    pub prize: String,
    pub deadline: String,
    pub status: &'static str,
}

impl From<&CompetitionResponse> for AdminRow {
    fn from(c: &CompetitionResponse) -> Self {
        Self {
            id: c.id,
            title: c.title.clone(),
            category: c.category.to_string(),
            prize: format_prize(c.prize_value),
            deadline: format_deadline(c.deadline),
            status: c.status.label(),
        }
    }
}

/// Add/edit form; `id` is set when editing an existing competition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitionForm {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub category: CompetitionCategory,
    pub start_date: NaiveDate,
    pub deadline: NaiveDate,
    pub prize_value: Decimal,
    pub entry_difficulty: EntryDifficulty,
    pub sponsor: String,
    pub entry_url: String,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub eligibility: Vec<String>,
}

impl CompetitionForm {
    /// Empty form for a new competition, running for 30 days from today
    pub fn blank() -> Self {
        let today = Utc::now().date_naive();
        Self {
            id: None,
            title: String::new(),
            description: String::new(),
            image_url: String::new(),
            category: CompetitionCategory::Sweepstakes,
            start_date: today,
            deadline: today + Days::new(30),
            prize_value: Decimal::ZERO,
            entry_difficulty: EntryDifficulty::Easy,
            sponsor: String::new(),
            entry_url: String::new(),
            requirements: Vec::new(),
            eligibility: Vec::new(),
        }
    }

    /// Form pre-populated from an existing competition
    pub fn edit(c: &CompetitionResponse) -> Self {
        Self {
            id: Some(c.id),
            title: c.title.clone(),
            description: c.description.clone(),
            image_url: c.image_url.clone(),
            category: c.category,
            start_date: c.start_date,
            deadline: c.deadline,
            prize_value: Decimal::from_f64(c.prize_value)
                .unwrap_or_default()
                .round_dp(2),
            entry_difficulty: c.entry_difficulty,
            sponsor: c.sponsor.clone(),
            entry_url: c.entry_url.clone(),
            requirements: c.requirements.clone(),
            eligibility: c.eligibility.clone(),
        }
    }

    pub fn is_editing(&self) -> bool {
        self.id.is_some()
    }

    pub fn heading(&self) -> &'static str {
        if self.is_editing() {
            "Edit Competition"
        } else {
            "Add New Competition"
        }
    }

    pub fn to_create_request(&self) -> CreateCompetitionRequest {
        CreateCompetitionRequest {
            title: self.title.clone(),
            description: self.description.clone(),
            image_url: self.image_url.clone(),
            category: self.category,
            start_date: self.start_date,
            deadline: self.deadline,
            prize_value: self.prize_value,
            entry_difficulty: self.entry_difficulty,
            sponsor: self.sponsor.clone(),
            entry_url: self.entry_url.clone(),
            requirements: self.requirements.clone(),
            eligibility: self.eligibility.clone(),
        }
    }

    /// Every form field as a patch; status is left untouched
    pub fn to_update_request(&self) -> UpdateCompetitionRequest {
        UpdateCompetitionRequest {
            title: Some(self.title.clone()),
            description: Some(self.description.clone()),
            image_url: Some(self.image_url.clone()),
            category: Some(self.category),
            start_date: Some(self.start_date),
            deadline: Some(self.deadline),
            prize_value: Some(self.prize_value),
            entry_difficulty: Some(self.entry_difficulty),
            sponsor: Some(self.sponsor.clone()),
            entry_url: Some(self.entry_url.clone()),
            status: None,
            requirements: Some(self.requirements.clone()),
            eligibility: Some(self.eligibility.clone()),
        }
    }
}

/// Read a form or patch from a JSON file
pub async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    tracing::info!("Loading competition data from: {}", path.display());
    let json_content = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&json_content)?)
}

pub struct AdminConsole<S: ?Sized> {
    source: Arc<S>,
    competitions: Vec<CompetitionResponse>,
}

impl<S: AdminSource + ?Sized> AdminConsole<S> {
    /// Open the console and load the table; requires an admin session
    pub async fn open(source: Arc<S>, session: &Session) -> Result<Self> {
        if !session.is_admin() {
            return Err(ClientError::Unauthorized);
        }

        let mut console = Self {
            source,
            competitions: Vec::new(),
        };
        console.load().await?;
        Ok(console)
    }

    pub async fn load(&mut self) -> Result<()> {
        self.competitions = self.source.list_all().await?;
        tracing::debug!(count = self.competitions.len(), "Admin table loaded");
        Ok(())
    }

    pub fn competitions(&self) -> &[CompetitionResponse] {
        &self.competitions
    }

    pub fn table(&self) -> Vec<AdminRow> {
        self.competitions.iter().map(AdminRow::from).collect()
    }

    pub fn new_form(&self) -> CompetitionForm {
        CompetitionForm::blank()
    }

    /// Form for the competition `id` as currently shown in the table
    pub fn edit(&self, id: Uuid) -> Result<CompetitionForm> {
        self.competitions
            .iter()
            .find(|c| c.id == id)
            .map(CompetitionForm::edit)
            .ok_or(ClientError::NotFound)
    }

    /// Create or update depending on whether the form carries an id
    pub async fn submit(&mut self, form: &CompetitionForm) -> Result<CompetitionResponse> {
        let draft = form.to_create_request();
        draft
            .validate()
            .map_err(|e| ClientError::ValidationError(e.to_string()))?;
        draft
            .validate_dates()
            .map_err(|msg| ClientError::ValidationError(msg.to_string()))?;

        let saved = match form.id {
            Some(id) => self.source.update(id, &form.to_update_request()).await?,
            None => self.source.create(&draft).await?,
        };

        tracing::info!(id = %saved.id, title = %saved.title, "Competition saved");
        self.load().await?;
        Ok(saved)
    }

    pub async fn update(
        &mut self,
        id: Uuid,
        patch: &UpdateCompetitionRequest,
    ) -> Result<CompetitionResponse> {
        patch
            .validate()
            .map_err(|e| ClientError::ValidationError(e.to_string()))?;

        let updated = self.source.update(id, patch).await?;
        self.load().await?;
        Ok(updated)
    }

    pub async fn archive(&mut self, id: Uuid) -> Result<CompetitionResponse> {
        let archived = self.source.archive(id).await?;
        tracing::info!(%id, "Competition archived");
        self.load().await?;
        Ok(archived)
    }

    pub async fn delete(&mut self, id: Uuid) -> Result<()> {
        self.source.delete(id).await?;
        tracing::info!(%id, "Competition deleted");
        self.load().await
    }
}
