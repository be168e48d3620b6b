use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use supernote_core::db::SyncConfig;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Runtime configuration; the replica auth token is redacted by `SyncConfig`'s `Debug`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub database_path: PathBuf,
    pub sync: Option<SyncConfig>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let values: HashMap<String, String> = env::vars().collect();
        Self::from_lookup(|name| values.get(name).cloned())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = value_or_default(&lookup, "SUPERNOTE_BIND_HOST", "0.0.0.0");
        let port = value_or_default(&lookup, "PORT", "5000")
            .parse::<u16>()
            .map_err(|_| {
                ConfigError::Invalid("PORT must be an integer in [1, 65535]".to_string())
            })?;
        if port == 0 {
            return Err(ConfigError::Invalid(
                "PORT must be in [1, 65535]".to_string(),
            ));
        }

        let database_path = PathBuf::from(value_or_default(
            &lookup,
            "SUPERNOTE_DATABASE_PATH",
            "supernote.db",
        ));

        let sync = parse_sync_config(&lookup)?;

        Ok(Self {
            bind_addr: format!("{host}:{port}"),
            database_path,
            sync,
        })
    }
}

fn parse_sync_config(
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<Option<SyncConfig>, ConfigError> {
    let url = optional_trimmed(&lookup, "TURSO_DATABASE_URL");
    let auth_token = optional_trimmed(&lookup, "TURSO_AUTH_TOKEN");
    if url.is_none() && auth_token.is_none() {
        return Ok(None);
    }

    let url = url.ok_or(ConfigError::MissingVar("TURSO_DATABASE_URL"))?;
    let auth_token = auth_token.ok_or(ConfigError::MissingVar("TURSO_AUTH_TOKEN"))?;
    if !is_remote_url(&url) {
        return Err(ConfigError::Invalid(
            "TURSO_DATABASE_URL must start with libsql://, http://, or https://".to_string(),
        ));
    }

    let interval_secs = value_or_default(&lookup, "TURSO_SYNC_INTERVAL_SECS", "60")
        .parse::<u64>()
        .map_err(|_| {
            ConfigError::Invalid(
                "TURSO_SYNC_INTERVAL_SECS must be an integer in [5, 3600]".to_string(),
            )
        })?;
    if !(5..=3_600).contains(&interval_secs) {
        return Err(ConfigError::Invalid(
            "TURSO_SYNC_INTERVAL_SECS must be in [5, 3600]".to_string(),
        ));
    }

    Ok(Some(
        SyncConfig::new(url, auth_token).with_sync_interval(Duration::from_secs(interval_secs)),
    ))
}

fn value_or_default(lookup: impl Fn(&str) -> Option<String>, name: &str, default: &str) -> String {
    optional_trimmed(lookup, name).unwrap_or_else(|| default.to_string())
}

fn optional_trimmed(lookup: impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name).and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn is_remote_url(value: &str) -> bool {
    ["libsql://", "http://", "https://"]
        .iter()
        .any(|scheme| value.starts_with(scheme))
}
