use std::path::Path;

use dialoguer::{theme::ColorfulTheme, Password};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CredentialsError {
    #[error("API key cannot be empty")]
    EmptyKey,
    #[error("Prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),
    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
}

/// Ask for the rate provider key without echoing it.
pub fn prompt_api_key() -> Result<String, CredentialsError> {
    let key = Password::with_theme(&ColorfulTheme::default())
        .with_prompt("Enter API key")
        .interact()?;
    Ok(key)
}

/// Replace the env file with a single `API_KEY=<key>` line.
pub fn save_api_key(path: &Path, key: &str) -> Result<(), CredentialsError> {
    let key = key.trim();
    if key.is_empty() {
        return Err(CredentialsError::EmptyKey);
    }

    std::fs::write(path, format!("API_KEY={}", key)).map_err(|source| CredentialsError::Write {
        path: path.display().to_string(),
        source,
    })?;

    tracing::info!(path = %path.display(), "API key saved");
    Ok(())
}
