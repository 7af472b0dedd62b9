use std::sync::Arc;

use chrono::NaiveDate;
use storage::dto::competition::CompetitionResponse;
use uuid::Uuid;

use crate::Result;
use crate::feed::{CompetitionFeed, FeedSnapshot};
use crate::filter_bar::FilterBar;
use crate::session::Session;
use crate::source::CompetitionSource;

/// `Mar 05, 2025`
pub fn format_deadline(date: NaiveDate) -> String {
    date.format("%b %d, %Y").to_string()
}

/// Whole US dollars with thousands separators, e.g. `$1,500`
pub fn format_prize(value: f64) -> String {
    let dollars = value.round().max(0.0) as u64;
    let digits = dollars.to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    format!("${grouped}")
}

/// One competition as rendered in the grid
#[derive(Debug, Clone, PartialEq)]
pub struct CompetitionCard {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub category: String,
    pub sponsor: String,
    pub difficulty: String,
    pub deadline: String,
    pub prize: String,
    pub entry_url: String,
    pub requirements: Vec<String>,
    pub eligibility: Vec<String>,
    pub is_saved: bool,
}

impl From<&CompetitionResponse> for CompetitionCard {
    fn from(c: &CompetitionResponse) -> Self {
        Self {
            id: c.id,
            title: c.title.clone(),
            description: c.description.clone(),
            image_url: c.image_url.clone(),
            category: c.category.to_string(),
            sponsor: c.sponsor.clone(),
            difficulty: c.entry_difficulty.to_string(),
            deadline: format_deadline(c.deadline),
            prize: format_prize(c.prize_value),
            entry_url: c.entry_url.clone(),
            requirements: c.requirements.clone(),
            eligibility: c.eligibility.clone(),
            is_saved: c.is_saved,
        }
    }
}

/// What the listing area shows
#[derive(Debug, Clone, PartialEq)]
pub enum ListingView {
    Loading,
    Failed { message: String },
    Empty,
    Populated(Vec<CompetitionCard>),
}

impl From<&FeedSnapshot> for ListingView {
    fn from(snapshot: &FeedSnapshot) -> Self {
        if snapshot.loading {
            return Self::Loading;
        }
        if let Some(message) = &snapshot.error {
            return Self::Failed {
                message: message.clone(),
            };
        }
        if snapshot.competitions.is_empty() {
            return Self::Empty;
        }
        Self::Populated(
            snapshot
                .competitions
                .iter()
                .map(CompetitionCard::from)
                .collect(),
        )
    }
}

/// The public listing: filter bar on top, competition grid below
pub struct ListingPage<S: ?Sized> {
    feed: CompetitionFeed<S>,
    filter_bar: FilterBar,
}

impl<S: CompetitionSource + ?Sized> ListingPage<S> {
    /// Build the page and run the initial load
    pub async fn mount(source: Arc<S>, session: Session) -> Self {
        let feed = CompetitionFeed::new(source, session);
        feed.fetch().await;
        let filter_bar = FilterBar::new(&feed.filters().await);

        Self { feed, filter_bar }
    }

    pub fn feed(&self) -> &CompetitionFeed<S> {
        &self.feed
    }

    pub fn filter_bar(&self) -> &FilterBar {
        &self.filter_bar
    }

    pub fn filter_bar_mut(&mut self) -> &mut FilterBar {
        &mut self.filter_bar
    }

    pub async fn view(&self) -> ListingView {
        ListingView::from(&self.feed.snapshot().await)
    }

    pub async fn apply_filters(&self) {
        self.filter_bar.apply(&self.feed).await;
    }

    pub async fn search(&mut self, text: impl Into<String>) {
        self.filter_bar.set_search(&self.feed, text).await;
    }

    /// "Reset Filters" shown on the empty state
    pub async fn reset_filters(&mut self) {
        self.filter_bar.reset(&self.feed).await;
    }

    /// "Try Again" shown on the error state
    pub async fn retry(&self) {
        self.feed.refetch().await;
    }

    pub async fn toggle_saved(&self, competition_id: Uuid) -> Result<Option<bool>> {
        self.feed.toggle_saved(competition_id).await
    }
}
