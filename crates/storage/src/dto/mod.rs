pub mod competition;
pub mod saved;
