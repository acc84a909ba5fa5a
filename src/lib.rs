//! # del-socials Library
//!
//! Deletes a user's historical Reddit posts and comments, or Twitter/X
//! tweets and replies, created before a cutoff date.
//!
//! ## Features
//!
//! - Reddit OAuth 2.0 password-grant authentication
//! - Twitter/X OAuth 1.0a user-context request signing
//! - Paginated listing with a fixed delay between pages
//! - Content-type selection (`all | posts | comments`, `all | tweets | replies`)
//! - Rate-limit waits on Twitter that never abort a pass
//! - Structured logging
//!
//! ## Configuration
//!
//! Credentials are read from `config.json` in the working directory (or the
//! path in `DEL_SOCIALS_CONFIG`):
//!
//! ```json
//! {
//!   "reddit": {
//!     "client_id": "...", "client_secret": "...",
//!     "username": "...", "password": "...", "user_agent": "..."
//!   },
//!   "twitter": {
//!     "api_key": "...", "api_key_secret": "...",
//!     "access_token": "...", "access_token_secret": "...", "username": "..."
//!   }
//! }
//! ```

pub mod cli;
pub mod config;
pub mod content;
pub mod deletion;
pub mod error;
pub mod oauth;
pub mod prompt;
pub mod reddit;
pub mod twitter;

// Re-export commonly used types and functions
pub use config::{load_config, Config, RedditCredentials, TwitterCredentials};
pub use content::{ContentItem, ContentKind, Cutoff, DeletionTally, RedditSelection, TwitterSelection};
pub use deletion::{sweep, ContentApi, IncompletePass, Listing, Page, Pacing};
pub use error::{DeleterError, Result};
pub use oauth::build_bearer_auth_header;
pub use prompt::{parse_choice, parse_date, Prompter};
pub use reddit::{RedditApi, RedditDeleter};
pub use twitter::{TwitterApi, TwitterDeleter};
