use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{ AppError, Result };

const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_MIN_CONNECTIONS: u32 = 1;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 8;

/// Database settings resolved from the environment.
///
/// Built once at startup and handed to [`crate::db::DatabaseEngine::connect`];
/// nothing in the crate reads the environment after that.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
    pub sql_logging: bool,
}

impl Config {
    /// Config for `database_url` with default pool settings.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            min_connections: DEFAULT_MIN_CONNECTIONS,
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            sql_logging: false,
        }
    }

    /// Load from the process environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolve every setting through `lookup`. `DATABASE_URL` is required and
    /// must not be blank.
    pub fn from_lookup<F>(lookup: F) -> Result<Self> where F: Fn(&str) -> Option<String> {
        let database_url = lookup("DATABASE_URL")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AppError::Config("DATABASE_URL must be set".to_string()))?;

        let max_connections = Self::parse_var(
            &lookup,
            "DATABASE_MAX_CONNECTIONS",
            DEFAULT_MAX_CONNECTIONS
        )?;
        let min_connections = Self::parse_var(
            &lookup,
            "DATABASE_MIN_CONNECTIONS",
            DEFAULT_MIN_CONNECTIONS
        )?;

        if max_connections == 0 {
            return Err(AppError::Config("DATABASE_MAX_CONNECTIONS must be at least 1".into()));
        }
        if min_connections > max_connections {
            return Err(
                AppError::Config(
                    format!(
                        "DATABASE_MIN_CONNECTIONS ({}) exceeds DATABASE_MAX_CONNECTIONS ({})",
                        min_connections,
                        max_connections
                    )
                )
            );
        }

        let connect_timeout_secs = Self::parse_var(
            &lookup,
            "DATABASE_CONNECT_TIMEOUT_SECS",
            DEFAULT_CONNECT_TIMEOUT_SECS
        )?;
        let sql_logging = Self::parse_var(&lookup, "DATABASE_SQL_LOGGING", false)?;

        Ok(Config {
            database_url,
            max_connections,
            min_connections,
            connect_timeout: Duration::from_secs(connect_timeout_secs),
            sql_logging,
        })
    }

    fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
        where F: Fn(&str) -> Option<String>, T: FromStr
    {
        match lookup(key) {
            Some(raw) if !raw.trim().is_empty() =>
                raw
                    .trim()
                    .to_lowercase()
                    .parse()
                    .map_err(|_| AppError::Config(format!("{} has an invalid value: {}", key, raw))),
            _ => Ok(default),
        }
    }

    /// The connection URL with any password replaced, safe for logs.
    pub fn redacted_url(&self) -> String {
        let url = &self.database_url;
        let Some(scheme_end) = url.find("://") else {
            return url.clone();
        };
        let rest = &url[scheme_end + 3..];
        let Some(at) = rest.rfind('@') else {
            return url.clone();
        };
        let credentials = &rest[..at];
        match credentials.find(':') {
            Some(colon) =>
                format!(
                    "{}{}:***{}",
                    &url[..scheme_end + 3],
                    &credentials[..colon],
                    &rest[at..]
                ),
            None => url.clone(),
        }
    }
}
