use chrono::NaiveDate;
use rust_decimal::Decimal;
use storage::filter::{Choice, DEFAULT_MAX_PRIZE, FilterOptions, PrizeRange};
use storage::models::{CompetitionCategory, EntryDifficulty};

use crate::feed::CompetitionFeed;
use crate::source::CompetitionSource;

/// Filter controls above the listing.
///
/// Edits go to a local draft until [`FilterBar::apply`] commits them. The
/// search box is the exception: [`FilterBar::set_search`] takes effect at once
/// and only carries the search text into the applied filters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterBar {
    draft: FilterOptions,
}

impl FilterBar {
    pub fn new(applied: &FilterOptions) -> Self {
        Self {
            draft: applied.clone(),
        }
    }

    pub fn draft(&self) -> &FilterOptions {
        &self.draft
    }

    pub fn set_category(&mut self, category: Choice<CompetitionCategory>) {
        self.draft.category = category;
    }

    pub fn set_difficulty(&mut self, difficulty: Choice<EntryDifficulty>) {
        self.draft.difficulty = difficulty;
    }

    /// Lower prize bound; the upper bound defaults to the maximum when unset
    pub fn set_min_prize(&mut self, min: Decimal) {
        let max = self
            .draft
            .prize_range
            .map(|r| r.max)
            .unwrap_or_else(|| Decimal::from(DEFAULT_MAX_PRIZE));
        self.draft.prize_range = Some(PrizeRange { min, max });
    }

    /// Upper prize bound; the lower bound defaults to zero when unset
    pub fn set_max_prize(&mut self, max: Decimal) {
        let min = self.draft.prize_range.map_or(Decimal::ZERO, |r| r.min);
        self.draft.prize_range = Some(PrizeRange { min, max });
    }

    pub fn clear_prize_range(&mut self) {
        self.draft.prize_range = None;
    }

    pub fn set_end_date(&mut self, end_date: Option<NaiveDate>) {
        self.draft.end_date = end_date;
    }

    /// Commit the draft and reload the listing
    pub async fn apply<S: CompetitionSource + ?Sized>(&self, feed: &CompetitionFeed<S>) {
        tracing::debug!(filters = ?self.draft, "Applying filters");
        feed.set_filters(self.draft.clone()).await;
    }

    /// Back to defaults, both here and in the feed
    pub async fn reset<S: CompetitionSource + ?Sized>(&mut self, feed: &CompetitionFeed<S>) {
        self.draft = FilterOptions::default();
        feed.set_filters(FilterOptions::default()).await;
    }

    pub async fn set_search<S: CompetitionSource + ?Sized>(
        &mut self,
        feed: &CompetitionFeed<S>,
        text: impl Into<String>,
    ) {
        let text = text.into();
        self.draft.search = text.clone();

        let mut applied = feed.filters().await;
        applied.search = text;
        feed.set_filters(applied).await;
    }
}
