//! Error types shared by every stage of a deletion run.

use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong between loading `config.json` and printing the summary.
#[derive(Debug, Error)]
pub enum DeleterError {
    #[error("failed to read config file {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    ConfigInvalid(String),

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// HTTP 429. Recovered by waiting where the provider policy allows it.
    #[error("rate limit reached during {0}")]
    RateLimited(String),

    #[error("failed to fetch {listing}: {reason}")]
    Fetch { listing: String, reason: String },

    #[error("failed to delete {id}: {reason}")]
    Delete { id: String, reason: String },

    #[error("invalid choice: {0}")]
    InvalidChoice(String),

    #[error("invalid date: {0}")]
    InvalidDate(String),

    #[error("failed to read input: {0}")]
    Input(#[from] std::io::Error),
}

impl DeleterError {
    pub fn fetch(listing: impl Into<String>, reason: impl ToString) -> Self {
        Self::Fetch {
            listing: listing.into(),
            reason: reason.to_string(),
        }
    }

    pub fn delete(id: impl Into<String>, reason: impl ToString) -> Self {
        Self::Delete {
            id: id.into(),
            reason: reason.to_string(),
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited(_))
    }
}

pub type Result<T> = std::result::Result<T, DeleterError>;
