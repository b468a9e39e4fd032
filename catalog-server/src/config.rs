//! Catalog server configuration

use std::time::Duration;

use crate::BoxError;

/// Catalog server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL
    pub database_url: String,
    /// HTTP listen address
    pub http_addr: String,
    /// Environment: development | staging | production
    pub environment: String,
    /// Upper bound on pooled connections
    pub db_max_open_conns: u32,
    /// Connections kept warm in the pool (capped at `db_max_open_conns`)
    pub db_max_idle_conns: u32,
    /// Idle connections older than this are closed
    pub db_max_idle_time: Duration,
    /// Budget for a single store operation
    pub db_query_timeout: Duration,
    /// Budget for a whole HTTP request
    pub http_request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            http_addr: "0.0.0.0:8080".into(),
            environment: "development".into(),
            db_max_open_conns: 30,
            db_max_idle_conns: 30,
            db_max_idle_time: Duration::from_secs(15 * 60),
            db_query_timeout: Duration::from_secs(5),
            http_request_timeout: Duration::from_secs(60),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, BoxError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let db_max_open_conns = match var("DB_MAX_OPEN_CONNS") {
            Some(v) => parse_count("DB_MAX_OPEN_CONNS", &v)?,
            None => defaults.db_max_open_conns,
        };
        let db_max_idle_conns = match var("DB_MAX_IDLE_CONNS") {
            Some(v) => parse_count("DB_MAX_IDLE_CONNS", &v)?,
            None => defaults.db_max_idle_conns,
        };

        Ok(Self {
            database_url: var("DATABASE_URL").ok_or("DATABASE_URL must be set")?,
            http_addr: var("HTTP_ADDR").unwrap_or(defaults.http_addr),
            environment: var("ENVIRONMENT").unwrap_or(defaults.environment),
            db_max_open_conns,
            db_max_idle_conns: db_max_idle_conns.min(db_max_open_conns),
            db_max_idle_time: match var("DB_MAX_IDLE_TIME") {
                Some(v) => parse_duration("DB_MAX_IDLE_TIME", &v)?,
                None => defaults.db_max_idle_time,
            },
            db_query_timeout: match var("DB_QUERY_TIMEOUT") {
                Some(v) => parse_duration("DB_QUERY_TIMEOUT", &v)?,
                None => defaults.db_query_timeout,
            },
            http_request_timeout: match var("HTTP_REQUEST_TIMEOUT") {
                Some(v) => parse_duration("HTTP_REQUEST_TIMEOUT", &v)?,
                None => defaults.http_request_timeout,
            },
        })
    }
}

fn parse_count(name: &str, value: &str) -> Result<u32, BoxError> {
    match value.trim().parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("{name} must be a positive integer, got '{value}'").into()),
    }
}

/// Parse `90`, `90s`, `15m` or `1h`; bare numbers are seconds
fn parse_duration(name: &str, value: &str) -> Result<Duration, BoxError> {
    let value = value.trim();
    let (digits, unit) = match value.char_indices().find(|(_, c)| !c.is_ascii_digit()) {
        Some((idx, _)) => value.split_at(idx),
        None => (value, "s"),
    };
    let amount: u64 = digits
        .parse()
        .map_err(|_| format!("{name} must look like 30s, 15m or 1h, got '{value}'"))?;
    let secs = match unit {
        "s" => amount,
        "m" => amount * 60,
        "h" => amount * 60 * 60,
        _ => return Err(format!("{name} has unknown unit '{unit}', expected s, m or h").into()),
    };
    if secs == 0 {
        return Err(format!("{name} must be greater than zero").into());
    }
    Ok(Duration::from_secs(secs))
}
