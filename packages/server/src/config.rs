use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use tracing::warn;

/// Development fallback for the shared upload password.
pub const DEV_UPLOAD_PASSWORD: &str = "odisha123";
/// Development fallback for the session token secret.
pub const DEV_TOKEN_SECRET: &str = "dev-key-change-later";

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    /// Allowed origins. Empty means same-origin only (no CORS layer).
    #[serde(default)]
    pub allow_origins: Vec<String>,
    #[serde(default = "default_cors_max_age")]
    pub max_age: u64,
}

fn default_cors_max_age() -> u64 {
    3600
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origins: Vec::new(),
            max_age: default_cors_max_age(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Root of the `<year>/<semester>/<subject>/<exam_type>/` tree.
    pub upload_dir: PathBuf,
    /// JSON collection of paper records.
    pub data_file: PathBuf,
    /// Upper bound on one upload request body.
    pub max_request_bytes: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// Shared secret that unlocks upload and delete.
    pub upload_password: String,
    /// HMAC key for admin session tokens.
    pub token_secret: String,
    /// Lifetime of an admin session.
    pub session_hours: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("PAPERS_CONFIG").unwrap_or_else(|_| "config/config".to_string());

        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 5000)?
            .set_default("storage.upload_dir", "./uploads")?
            .set_default("storage.data_file", "./data/papers.json")?
            .set_default("storage.max_request_bytes", 50_i64 * 1024 * 1024)?
            .set_default("auth.upload_password", DEV_UPLOAD_PASSWORD)?
            .set_default("auth.token_secret", DEV_TOKEN_SECRET)?
            .set_default("auth.session_hours", 12)?
            // Load from config/config.toml (or $PAPERS_CONFIG)
            .add_source(File::with_name(&config_path).required(false))
            // Override from environment (e.g., PAPERS__AUTH__UPLOAD_PASSWORD)
            .add_source(Environment::with_prefix("PAPERS").separator("__"))
            .build()?;

        s.try_deserialize()
    }

    /// Log a warning for every development default still in effect.
    pub fn warn_on_dev_defaults(&self) {
        if self.auth.upload_password == DEV_UPLOAD_PASSWORD {
            warn!("auth.upload_password is the development default; set PAPERS__AUTH__UPLOAD_PASSWORD");
        }
        if self.auth.token_secret == DEV_TOKEN_SECRET {
            warn!("auth.token_secret is the development default; set PAPERS__AUTH__TOKEN_SECRET");
        }
    }
}
