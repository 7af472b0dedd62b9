pub mod admin;
pub mod competitions;
pub mod saved;
