pub mod competition;
pub mod saved_competition;
