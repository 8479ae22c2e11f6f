use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::exchange_rate::DEFAULT_BASE_URL;

pub const DEFAULT_ENV_FILE: &str = ".env";
pub const DEFAULT_DEAL_LIST_URL: &str = "https://www.xbox-now.com/en/deal-list";
pub const DEFAULT_TARGET_CURRENCY: &str = "RUB";
pub const DEFAULT_REPORTS_DIR: &str = "reports";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set (run the `setup` binary to store an API key)")]
    MissingVar(&'static str),
    #[error("Failed to read {path}: {source}")]
    EnvFile {
        path: String,
        source: dotenvy::Error,
    },
}

/// Settings for one pipeline run, loaded from the environment and `.env`.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub deal_list_url: String,
    pub user_agent: String,
    pub target_currency: String,
    /// `None` leaves the base currency to the rate provider (USD).
    pub base_currency: Option<String>,
    pub reports_dir: PathBuf,
    pub rates_url: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        load_env_file(Path::new(DEFAULT_ENV_FILE))?;
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Ok(Self {
            api_key: var("API_KEY").ok_or(ConfigError::MissingVar("API_KEY"))?,
            deal_list_url: var("DEAL_LIST_URL")
                .unwrap_or_else(|| DEFAULT_DEAL_LIST_URL.to_string()),
            user_agent: var("USER_AGENT").unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            target_currency: var("TARGET_CURRENCY")
                .map(|code| code.to_uppercase())
                .unwrap_or_else(|| DEFAULT_TARGET_CURRENCY.to_string()),
            base_currency: var("BASE_CURRENCY").map(|code| code.to_uppercase()),
            reports_dir: var("REPORTS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORTS_DIR)),
            rates_url: var("RATES_API_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        })
    }
}

/// Export the variables of an env file. A missing file is fine when the
/// variables come from the shell; a malformed one is an error.
pub fn load_env_file(path: &Path) -> Result<(), ConfigError> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(()),
        Err(err) if err.not_found() => {
            tracing::debug!(path = %path.display(), "No env file, using process environment");
            Ok(())
        }
        Err(source) => Err(ConfigError::EnvFile {
            path: path.display().to_string(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[("API_KEY", "secret")])).unwrap();

        assert_eq!(config.api_key, "secret");
        assert_eq!(config.deal_list_url, DEFAULT_DEAL_LIST_URL);
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(config.target_currency, "RUB");
        assert_eq!(config.base_currency, None);
        assert_eq!(config.reports_dir, PathBuf::from("reports"));
        assert_eq!(config.rates_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("API_KEY", "secret"),
            ("DEAL_LIST_URL", "http://localhost:8080/deals"),
            ("TARGET_CURRENCY", "kzt"),
            ("BASE_CURRENCY", "eur"),
            ("REPORTS_DIR", "/tmp/out"),
        ]))
        .unwrap();

        assert_eq!(config.deal_list_url, "http://localhost:8080/deals");
        assert_eq!(config.target_currency, "KZT");
        assert_eq!(config.base_currency.as_deref(), Some("EUR"));
        assert_eq!(config.reports_dir, PathBuf::from("/tmp/out"));
    }

    #[test]
    fn test_missing_api_key() {
        let result = Config::from_lookup(lookup(&[]));
        assert!(matches!(result, Err(ConfigError::MissingVar("API_KEY"))));

        let result = Config::from_lookup(lookup(&[("API_KEY", "  ")]));
        assert!(matches!(result, Err(ConfigError::MissingVar("API_KEY"))));
    }

    #[test]
    fn test_missing_env_file_is_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(load_env_file(&tmp.path().join(".env")).is_ok());
    }

    #[test]
    fn test_malformed_env_file_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(".env");
        std::fs::write(&path, "DEAL_SHEET_UNUSED_KEY=\"unterminated\n").unwrap();

        let result = load_env_file(&path);
        assert!(matches!(result, Err(ConfigError::EnvFile { .. })));
    }
}
