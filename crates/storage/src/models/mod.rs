mod category;
mod competition;
mod saved_competition;

pub use category::{CompetitionCategory, CompetitionStatus, EntryDifficulty, ParseEnumError};
pub use competition::Competition;
pub use saved_competition::SavedCompetition;
