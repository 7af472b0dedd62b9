pub mod admin;
pub mod api;
pub mod error;
pub mod feed;
pub mod filter_bar;
pub mod listing;
pub mod session;
pub mod source;

#[cfg(test)]
pub(crate) mod memory;

pub use admin::{AdminConsole, AdminRow, CompetitionForm, read_json};
pub use api::ApiClient;
pub use error::{ClientError, Result};
pub use feed::{CompetitionFeed, FeedSnapshot, LOAD_ERROR_MESSAGE};
pub use filter_bar::FilterBar;
pub use listing::{CompetitionCard, ListingPage, ListingView};
pub use session::{Route, Session};
pub use source::{AdminSource, CompetitionSource};
