//! Application configuration loaded from environment variables.

use crate::errors::{AppError, Result};

#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite database URL or file path (created if missing)
    pub database_url: String,
    /// Upper bound on pooled SQLite connections
    pub db_max_connections: u32,
    /// Port for the REST API server
    pub api_port: u16,
    /// Directory that stores uploaded card backgrounds
    pub upload_dir: String,
    /// Largest accepted background image, in decoded bytes
    pub upload_max_bytes: usize,
    /// Prefix of the per-guest contribution links (no trailing slash)
    pub public_base_url: String,
    /// Pledge used when a guest entry carries none
    pub default_pledge_amount: i64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Config {
            database_url: env_var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:./nova_events.db".to_string()),
            db_max_connections: env_var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .map_err(|_| AppError::Config("Invalid DB_MAX_CONNECTIONS".to_string()))?,
            api_port: env_var("API_PORT")
                .unwrap_or_else(|_| "3001".to_string())
                .parse()
                .map_err(|_| AppError::Config("Invalid API_PORT".to_string()))?,
            upload_dir: env_var("UPLOAD_DIR").unwrap_or_else(|_| "./uploads".to_string()),
            upload_max_bytes: env_var("UPLOAD_MAX_BYTES")
                .unwrap_or_else(|_| "5242880".to_string())
                .parse()
                .map_err(|_| AppError::Config("Invalid UPLOAD_MAX_BYTES".to_string()))?,
            public_base_url: env_var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3001".to_string())
                .trim_end_matches('/')
                .to_string(),
            default_pledge_amount: env_var("DEFAULT_PLEDGE_AMOUNT")
                .unwrap_or_else(|_| nova_core::DEFAULT_PLEDGE_AMOUNT.to_string())
                .parse::<i64>()
                .ok()
                .filter(|v| (1..=nova_core::MAX_PLEDGE_AMOUNT).contains(v))
                .ok_or_else(|| AppError::Config("Invalid DEFAULT_PLEDGE_AMOUNT".to_string()))?,
        })
    }
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| AppError::Config(format!("Missing env var: {key}")))
}
