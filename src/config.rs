use std::env;
use std::str::FromStr;

use crate::services::DEFAULT_LIMIT;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    MongoDb,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mongodb" | "mongo" => Ok(StorageBackend::MongoDb),
            "memory" => Ok(StorageBackend::Memory),
            _ => Err(()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} has an invalid value: {value:?}")]
    Invalid { name: &'static str, value: String },

    #[error("DATABASE_URL must be set when STORAGE_BACKEND=mongodb")]
    MissingDatabaseUrl,
}

/// Configuração lida do ambiente (.env é carregado no main)
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub storage: StorageBackend,
    pub database_url: Option<String>,
    pub users_collection: String,
    pub default_page_limit: u64,
    pub cors_allowed_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            storage: StorageBackend::MongoDb,
            database_url: None,
            users_collection: "users".to_string(),
            default_page_limit: DEFAULT_LIMIT,
            cors_allowed_origins: vec!["http://localhost:3000".to_string()],
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(raw) => parse_var("PORT", raw, |v| v.parse::<u16>().ok())?,
            None => defaults.port,
        };

        let storage = match lookup("STORAGE_BACKEND") {
            Some(raw) => parse_var("STORAGE_BACKEND", raw, |v| v.parse().ok())?,
            None => defaults.storage,
        };

        let default_page_limit = match lookup("DEFAULT_PAGE_LIMIT") {
            Some(raw) => parse_var("DEFAULT_PAGE_LIMIT", raw, |v| {
                v.parse::<u64>().ok().filter(|n| *n > 0)
            })?,
            None => defaults.default_page_limit,
        };

        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());
        if storage == StorageBackend::MongoDb && database_url.is_none() {
            return Err(ConfigError::MissingDatabaseUrl);
        }

        let cors_allowed_origins = match lookup("CORS_ALLOWED_ORIGINS") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(String::from)
                .collect(),
            None => defaults.cors_allowed_origins,
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port,
            storage,
            database_url,
            users_collection: lookup("USERS_COLLECTION").unwrap_or(defaults.users_collection),
            default_page_limit,
            cors_allowed_origins,
        })
    }
}

fn parse_var<T>(name: &'static str, raw: String, parse: impl Fn(&str) -> Option<T>) -> Result<T, ConfigError> {
    parse(raw.trim()).ok_or(ConfigError::Invalid { name, value: raw })
}
