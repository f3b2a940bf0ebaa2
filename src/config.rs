use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct DbConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl DbConfig {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub db: DbConfig,
    pub max_upload_bytes: usize,
    /// When false, 500 responses carry a fixed `details` string instead of the raw error.
    pub expose_error_details: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key: &str| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let database_url = get("DATABASE_URL")
            .ok_or_else(|| anyhow::anyhow!("DATABASE_URL is not set"))?;
        let db = DbConfig {
            url: database_url,
            max_connections: parse_or(get("DB_MAX_CONNECTIONS"), 10),
            acquire_timeout_secs: parse_or(get("DB_ACQUIRE_TIMEOUT_SECS"), 30),
        };
        Ok(Self {
            host: get("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: parse_or(get("APP_PORT"), 4149),
            db,
            max_upload_bytes: parse_or(get("MAX_UPLOAD_BYTES"), 20 * 1024 * 1024),
            expose_error_details: parse_or(get("EXPOSE_ERROR_DETAILS"), true),
        })
    }
}

fn parse_or<T: std::str::FromStr>(raw: Option<String>, default: T) -> T {
    raw.and_then(|v| v.trim().parse::<T>().ok()).unwrap_or(default)
}
