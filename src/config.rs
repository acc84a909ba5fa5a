//! Configuration module for del-socials.
//!
//! This module loads the provider credentials from a local JSON file and
//! validates each provider section before a client is built from it.

use log::{debug, error, info, warn};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{DeleterError, Result};

/// Default location of the credentials file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
pub const CONFIG_PATH_ENV: &str = "DEL_SOCIALS_CONFIG";

/// Credentials for both providers, as read from `config.json`.
///
/// Either section may be absent; it is only validated once the operator
/// picks that platform.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub reddit: RedditCredentials,
    #[serde(default)]
    pub twitter: TwitterCredentials,
}

/// Reddit "script" app credentials used for the password grant.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RedditCredentials {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub user_agent: String,
}

/// Twitter/X OAuth 1.0a user-context credentials.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TwitterCredentials {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub api_key_secret: String,
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub access_token_secret: String,
    #[serde(default)]
    pub username: String,
}

impl RedditCredentials {
    /// Checks that every field the password grant needs is present.
    pub fn validate(&self) -> Result<()> {
        let missing: Vec<&str> = [
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
            ("username", &self.username),
            ("password", &self.password),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if !missing.is_empty() {
            error!("Reddit credentials incomplete: {}", missing.join(", "));
            return Err(DeleterError::ConfigInvalid(format!(
                "missing Reddit credentials: {}",
                missing.join(", ")
            )));
        }

        debug!("Reddit client id (masked): {}", mask_secret(&self.client_id));
        Ok(())
    }

    /// The User-Agent sent with every Reddit request.
    ///
    /// Reddit rejects generic agents, so a blank value falls back to one that
    /// names this tool and the account.
    pub fn effective_user_agent(&self) -> String {
        if self.user_agent.trim().is_empty() {
            warn!("No user_agent configured for Reddit, using a generated one");
            format!(
                "del-socials/{} by {}",
                env!("CARGO_PKG_VERSION"),
                self.username
            )
        } else {
            self.user_agent.clone()
        }
    }
}

impl TwitterCredentials {
    /// Checks that the four OAuth 1.0a secrets and the username are present.
    pub fn validate(&self) -> Result<()> {
        let missing: Vec<&str> = [
            ("api_key", &self.api_key),
            ("api_key_secret", &self.api_key_secret),
            ("access_token", &self.access_token),
            ("access_token_secret", &self.access_token_secret),
            ("username", &self.username),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if !missing.is_empty() {
            error!("Twitter credentials incomplete: {}", missing.join(", "));
            return Err(DeleterError::ConfigInvalid(format!(
                "missing Twitter credentials: {}",
                missing.join(", ")
            )));
        }

        debug!("Twitter API key (masked): {}", mask_secret(&self.api_key));
        debug!(
            "Twitter access token (masked): {}",
            mask_secret(&self.access_token)
        );
        Ok(())
    }
}

/// Resolves the config path: `DEL_SOCIALS_CONFIG` if set, else `config.json`.
pub fn config_path() -> PathBuf {
    match env::var(CONFIG_PATH_ENV) {
        Ok(path) if !path.trim().is_empty() => {
            info!("Using config file from {}: {}", CONFIG_PATH_ENV, path);
            PathBuf::from(path)
        }
        _ => PathBuf::from(DEFAULT_CONFIG_PATH),
    }
}

/// Reads and parses the credentials file at `path`.
///
/// # Errors
///
/// - [`DeleterError::ConfigRead`] if the file is missing or unreadable
/// - [`DeleterError::ConfigParse`] if it is not valid JSON of the expected shape
pub fn load_config(path: &Path) -> Result<Config> {
    info!("Loading configuration from {}", path.display());

    let raw = fs::read_to_string(path).map_err(|source| DeleterError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;

    let config: Config =
        serde_json::from_str(&raw).map_err(|source| DeleterError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;

    info!("Configuration loaded successfully");
    Ok(config)
}

/// Renders a secret as `prefix...suffix` so it can appear in logs.
///
/// Up to eight characters are kept at each end, and only when the secret is
/// long enough that the masked part still hides something.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    let len = chars.len();

    let prefix: String = chars.iter().take(len.min(8)).collect();
    if len > 16 {
        let suffix: String = chars[len - 8..].iter().collect();
        format!("{}...{}", prefix, suffix)
    } else if len > 8 {
        format!("{}...", prefix)
    } else {
        // Short secrets are fully hidden.
        "...".to_string()
    }
}
