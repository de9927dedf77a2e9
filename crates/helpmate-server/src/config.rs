use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::warn;

const DEV_JWT_SECRET: &str = "dev-secret-change-me";

/// Runtime settings, read from the environment (and `.env` if present).
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub addr: SocketAddr,
    pub jwt_secret: String,
    pub token_ttl: chrono::Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let jwt_secret = get("HELPMATE_JWT_SECRET").unwrap_or_else(|| {
            warn!("HELPMATE_JWT_SECRET not set, using the development secret");
            DEV_JWT_SECRET.into()
        });
        let db_path = get("HELPMATE_DB_PATH").unwrap_or_else(|| "helpmate.db".into());
        let host = get("HELPMATE_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = get("HELPMATE_PORT")
            .unwrap_or_else(|| "3000".into())
            .parse()
            .context("HELPMATE_PORT must be a port number")?;
        let ttl_days: i64 = get("HELPMATE_TOKEN_TTL_DAYS")
            .unwrap_or_else(|| "30".into())
            .parse()
            .context("HELPMATE_TOKEN_TTL_DAYS must be a whole number of days")?;
        if ttl_days < 1 {
            anyhow::bail!("HELPMATE_TOKEN_TTL_DAYS must be at least 1");
        }

        let addr: SocketAddr = format!("{}:{}", host, port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", host, port))?;

        Ok(Self {
            db_path: PathBuf::from(db_path),
            addr,
            jwt_secret,
            token_ttl: chrono::Duration::days(ttl_days),
        })
    }
}
