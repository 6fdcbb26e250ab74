mod admin;
mod browse;
mod common;
