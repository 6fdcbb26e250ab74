use std::sync::Arc;

use argon2::password_hash;
use common::Catalog;

use crate::config::AppConfig;
use crate::utils::hash;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub config: AppConfig,
    /// Argon2 PHC hash of `config.auth.upload_password`.
    pub password_hash: Arc<str>,
}

impl AppState {
    /// Build the state, hashing the configured upload password once.
    pub fn new(catalog: Arc<Catalog>, config: AppConfig) -> Result<Self, password_hash::Error> {
        let password_hash = hash::hash_password(&config.auth.upload_password)?;
        Ok(Self {
            catalog,
            config,
            password_hash: password_hash.into(),
        })
    }
}
