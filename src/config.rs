use std::net::IpAddr;

use crate::repositories::NameMatch;

/// Runtime settings read from the environment (after `.env` is loaded).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: IpAddr,
    pub port: u16,
    /// No URL means the catalog lives in memory for the life of the process.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub name_match: NameMatch,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 8080,
            database_url: None,
            db_max_connections: 5,
            name_match: NameMatch::Exact,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Unparseable values fall back to the default and are logged.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            host: parse_or(get("HOST"), "HOST", defaults.host),
            port: parse_or(get("PORT"), "PORT", defaults.port),
            database_url: get("DATABASE_URL"),
            db_max_connections: parse_or(
                get("DB_MAX_CONNECTIONS"),
                "DB_MAX_CONNECTIONS",
                defaults.db_max_connections,
            ),
            name_match: parse_or(get("NAME_MATCH"), "NAME_MATCH", defaults.name_match),
        }
    }
}

fn parse_or<T>(raw: Option<String>, key: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Debug,
{
    match raw {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, ?default, "Ignoring invalid setting");
            default
        }),
    }
}
