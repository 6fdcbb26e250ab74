pub mod admin;
pub mod browse;
pub mod files;
pub mod papers;
