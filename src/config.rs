use anyhow::{Context, Result};
use std::env;

/// Caller name the scan endpoint accepts alongside the shared secret.
pub const AUTH_NAME: &str = "beau";

const DEFAULT_GROWTH_THRESHOLD: f64 = 0.4;
const DEFAULT_WINDOW_LIMIT: u32 = 289;

#[derive(Debug, Clone)]
pub struct Config {
    pub auth_pwd: String,
    pub webhook_url: String,
    pub clickhouse_url: String,
    pub growth_threshold: f64,
    pub window_limit: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let auth_pwd = env::var("AUTH_PWD").context("AUTH_PWD must be set")?;
        let webhook_url = env::var("LARK_HOOK_URL").context("LARK_HOOK_URL must be set")?;
        let clickhouse_url = env::var("CLICKHOUSE_URL")
            .unwrap_or_else(|_| "http://localhost:8123".to_string());

        let growth_threshold = match env::var("GROWTH_THRESHOLD") {
            Ok(raw) => raw
                .parse()
                .context("GROWTH_THRESHOLD must be a decimal number")?,
            Err(_) => DEFAULT_GROWTH_THRESHOLD,
        };

        let window_limit = match env::var("OI_WINDOW_LIMIT") {
            Ok(raw) => raw.parse().context("OI_WINDOW_LIMIT must be an integer")?,
            Err(_) => DEFAULT_WINDOW_LIMIT,
        };

        Ok(Self {
            auth_pwd,
            webhook_url,
            clickhouse_url,
            growth_threshold,
            window_limit,
        })
    }
}
