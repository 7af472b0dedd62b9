pub mod auth;
pub mod viewer;
