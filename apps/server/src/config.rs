use std::{net::SocketAddr, str::FromStr, time::Duration};

use anyhow::Context;

use crate::auth::decode_secret_key;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => anyhow::bail!("Invalid TB_LOG_FORMAT '{other}', expected 'text' or 'json'"),
        }
    }
}

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    /// `None` means a random secret is generated at startup.
    pub jwt_secret: Option<Vec<u8>>,
    pub token_ttl: Duration,
    pub fx_base_url: String,
    pub fx_timeout: Duration,
    pub fx_cache_ttl: Duration,
    pub log_format: LogFormat,
}

impl Config {
    /// Reads `TB_*` variables, after loading `.env` if present.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let number = |key: &str, default: u64| {
            lookup(key)
                .and_then(|raw| raw.trim().parse::<u64>().ok())
                .unwrap_or(default)
        };

        let listen_addr: SocketAddr = var("TB_LISTEN_ADDR", "0.0.0.0:8080")
            .parse()
            .context("Invalid TB_LISTEN_ADDR")?;
        let db_path = var("TB_DB_PATH", "./db/tallybook.db");
        let cors_allow = var("TB_CORS_ALLOW_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let jwt_secret = match lookup("TB_JWT_SECRET") {
            Some(raw) => Some(decode_secret_key(&raw).context("Invalid TB_JWT_SECRET")?),
            None => None,
        };
        let log_format = var("TB_LOG_FORMAT", "text").parse()?;

        Ok(Self {
            listen_addr,
            db_path,
            cors_allow,
            request_timeout: Duration::from_millis(number("TB_REQUEST_TIMEOUT_MS", 30_000)),
            jwt_secret,
            token_ttl: Duration::from_secs(number("TB_TOKEN_TTL_MINUTES", 60) * 60),
            fx_base_url: var("TB_FX_BASE_URL", "https://api.exchangerate.host"),
            fx_timeout: Duration::from_secs(number("TB_FX_TIMEOUT_SECS", 5)),
            fx_cache_ttl: Duration::from_secs(number("TB_FX_CACHE_TTL_HOURS", 12) * 60 * 60),
            log_format,
        })
    }
}
