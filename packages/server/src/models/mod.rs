pub mod auth;
pub mod paper;
