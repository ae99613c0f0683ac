use anyhow::{Context, Result};
use dotenvy::dotenv;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Global configuration accessor to keep the rest of the application stateless.
pub static CONFIG: Lazy<AppConfig> = Lazy::new(|| {
    AppConfig::load_from_env().expect("failed to load configuration from environment")
});

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_dir")]
    pub directory: PathBuf,
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: default_log_dir(),
            filter: default_log_filter(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Seed for the weather generator; `None` draws from OS entropy.
    pub weather_seed: Option<u64>,
}

impl AppConfig {
    /// Build configuration from well-known environment variables.
    pub fn load_from_env() -> Result<Self> {
        preload_env_files();

        let directory = env_var_non_empty("LEMONADE_LOG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_log_dir());
        let filter =
            env_var_non_empty("LEMONADE_LOG_FILTER").unwrap_or_else(|_| default_log_filter());

        let weather_seed = match env_var_non_empty("LEMONADE_WEATHER_SEED") {
            Ok(raw) => Some(parse_seed(&raw)?),
            Err(_) => None,
        };

        Ok(Self {
            logging: LoggingConfig { directory, filter },
            weather_seed,
        })
    }
}

fn parse_seed(raw: &str) -> Result<u64> {
    raw.trim()
        .parse::<u64>()
        .with_context(|| format!("LEMONADE_WEATHER_SEED must be an unsigned integer, got {raw:?}"))
}

fn env_var_non_empty(key: &str) -> Result<String, env::VarError> {
    let value = env::var(key)?;
    if value.trim().is_empty() {
        return Err(env::VarError::NotPresent);
    }
    Ok(value)
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_log_filter() -> String {
    "info".to_string()
}

fn preload_env_files() {
    // Picks up a .env in the working directory or any parent, if present.
    let _ = dotenv();

    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let candidate = manifest_dir.join("../../.env");
    if candidate.exists() {
        let _ = dotenvy::from_path(candidate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_accepts_surrounding_whitespace() {
        assert_eq!(parse_seed(" 42 ").unwrap(), 42);
    }

    #[test]
    fn seed_rejects_non_numeric_values() {
        let err = parse_seed("sunny").unwrap_err();
        assert!(err.to_string().contains("LEMONADE_WEATHER_SEED"));
    }

    #[test]
    fn logging_defaults_to_info_under_logs() {
        let logging = LoggingConfig::default();
        assert_eq!(logging.directory, PathBuf::from("logs"));
        assert_eq!(logging.filter, "info");
    }
}
