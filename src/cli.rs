//! The interactive driver.
//!
//! Walks `LoadConfig -> ChoosePlatform -> Reddit | Twitter -> Summary`.
//! Any failure is returned as a [`StageError`] naming the stage it happened
//! in; the binary turns that into a non-zero exit.

use chrono::NaiveDate;
use log::{info, warn};
use std::fmt;
use std::io::{BufRead, Write};
use std::path::Path;
use thiserror::Error;

use crate::config::{load_config, RedditCredentials, TwitterCredentials};
use crate::content::{Cutoff, DeletionTally, RedditSelection, TwitterSelection};
use crate::deletion::Pacing;
use crate::prompt::Prompter;
use crate::reddit::{RedditApi, RedditDeleter, REDDIT_AUTH_BASE, REDDIT_OAUTH_BASE};
use crate::twitter::{TwitterApi, TwitterDeleter, TWITTER_API_BASE};

/// Where the flows start when the operator just presses Enter.
pub fn default_cutoff_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or_default()
}

const PLATFORMS: [&str; 2] = ["reddit", "twitter"];
const CONTINUE_ANYWAY: &str = "Continue anyway";
const EXIT: &str = "Exit";
const ALTERNATIVE_TOOL: &str = "https://github.com/Lyfhael/DeleteTweets";

/// Steps of a run, used to say where a fatal error happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    LoadConfig,
    ChoosePlatform,
    Reddit,
    Twitter,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::LoadConfig => "loading configuration",
            Stage::ChoosePlatform => "choosing platform",
            Stage::Reddit => "Reddit deletion",
            Stage::Twitter => "Twitter deletion",
        };
        f.write_str(name)
    }
}

/// A fatal error and the stage that produced it.
#[derive(Debug, Error)]
#[error("Failed at {stage}: {source}")]
pub struct StageError {
    pub stage: Stage,
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync>,
}

impl StageError {
    fn at(stage: Stage, source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        StageError {
            stage,
            source: source.into(),
        }
    }
}

/// The provider a run targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Reddit,
    Twitter,
}

/// Final counts of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub platform: Platform,
    pub tally: DeletionTally,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (name, primary, secondary) = match self.platform {
            Platform::Reddit => ("Reddit", "Posts", "Comments"),
            Platform::Twitter => ("Twitter", "Tweets", "Replies"),
        };
        writeln!(f, "{} Deletion Summary:", name)?;
        writeln!(f, "- {} deleted: {}", primary, self.tally.primary)?;
        writeln!(f, "- {} deleted: {}", secondary, self.tally.secondary)?;
        write!(f, "Total items deleted: {}", self.tally.total())
    }
}

/// Provider hosts. Production by default; tests point them at a mock server.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub reddit_auth: String,
    pub reddit_oauth: String,
    pub twitter_api: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Endpoints {
            reddit_auth: REDDIT_AUTH_BASE.to_string(),
            reddit_oauth: REDDIT_OAUTH_BASE.to_string(),
            twitter_api: TWITTER_API_BASE.to_string(),
        }
    }
}

/// Interactive session over a reader and writer.
pub struct Cli<R, W> {
    prompter: Prompter<R, W>,
    endpoints: Endpoints,
    reddit_pacing: Pacing,
    twitter_pacing: Pacing,
}

impl<R: BufRead, W: Write> Cli<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Cli {
            prompter: Prompter::new(input, output),
            endpoints: Endpoints::default(),
            reddit_pacing: Pacing::reddit(),
            twitter_pacing: Pacing::twitter(),
        }
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn with_pacing(mut self, reddit: Pacing, twitter: Pacing) -> Self {
        self.reddit_pacing = reddit;
        self.twitter_pacing = twitter;
        self
    }

    /// Runs one deletion session.
    ///
    /// Returns `Ok(None)` when the operator backs out at the Twitter notice.
    pub async fn run(&mut self, config_path: &Path) -> Result<Option<Summary>, StageError> {
        let config = load_config(config_path).map_err(|e| StageError::at(Stage::LoadConfig, e))?;

        let platform = self
            .prompter
            .choose("Choose platform:", &PLATFORMS, None)
            .map_err(|e| StageError::at(Stage::ChoosePlatform, e))?;
        info!("Operator chose {}", platform);

        match platform.as_str() {
            "reddit" => self
                .reddit_flow(&config.reddit)
                .await
                .map(Some)
                .map_err(|e| StageError::at(Stage::Reddit, e)),
            _ => {
                if !self
                    .confirm_twitter()
                    .map_err(|e| StageError::at(Stage::Twitter, e))?
                {
                    println!("Exiting. Please check out the recommended alternative tool.");
                    return Ok(None);
                }
                self.twitter_flow(&config.twitter)
                    .await
                    .map(Some)
                    .map_err(|e| StageError::at(Stage::Twitter, e))
            }
        }
    }

    /// Warns that the free API tier rarely allows deletes and asks whether to go on.
    fn confirm_twitter(&mut self) -> crate::error::Result<bool> {
        println!("\nImportant Notice about Twitter/X Deletion");
        println!("Twitter/X has significantly restricted their API access for free accounts.");
        println!("As a result, this tool may no longer work reliably with Twitter.");
        println!("\nRecommended Alternative:");
        println!("Please use DeleteTweets: {}", ALTERNATIVE_TOOL);
        println!("\nWould you like to:");

        let choice = self
            .prompter
            .choose("", &[CONTINUE_ANYWAY, EXIT], Some(EXIT))?;
        Ok(choice == CONTINUE_ANYWAY)
    }

    fn ask_cutoff(&mut self) -> crate::error::Result<Cutoff> {
        let date = self.prompter.date(
            "Enter the date before which to delete content",
            default_cutoff_date(),
        )?;
        Ok(Cutoff::from_date(date))
    }

    async fn reddit_flow(
        &mut self,
        credentials: &RedditCredentials,
    ) -> Result<Summary, Box<dyn std::error::Error + Send + Sync>> {
        let api = RedditApi::authenticate_with(
            credentials,
            &self.endpoints.reddit_auth,
            &self.endpoints.reddit_oauth,
        )
        .await?;
        let name = api.verify_identity().await?;
        println!("Authenticated as user: {}\n", name);

        let selection: RedditSelection = self
            .prompter
            .choose(
                "What would you like to delete?",
                &RedditSelection::OPTIONS,
                Some("all"),
            )?
            .parse()?;
        let cutoff = self.ask_cutoff()?;

        println!("\nDeleting {} before {}...\n", selection, cutoff);

        let mut deleter = RedditDeleter::with_pacing(api, self.reddit_pacing.clone());
        let tally = deleter.delete_content(selection, cutoff).await?;

        Ok(Summary {
            platform: Platform::Reddit,
            tally,
        })
    }

    async fn twitter_flow(
        &mut self,
        credentials: &TwitterCredentials,
    ) -> Result<Summary, Box<dyn std::error::Error + Send + Sync>> {
        let api = TwitterApi::connect_with(
            credentials,
            &self.endpoints.twitter_api,
            &self.twitter_pacing,
        )
        .await?;
        println!("Authenticated as @{} (id {})\n", api.username(), api.user_id());

        let selection: TwitterSelection = self
            .prompter
            .choose(
                "What would you like to delete?",
                &TwitterSelection::OPTIONS,
                Some("all"),
            )?
            .parse()?;
        let cutoff = self.ask_cutoff()?;

        println!("\nDeleting {} before {}...\n", selection, cutoff);

        let mut deleter = TwitterDeleter::with_pacing(api, self.twitter_pacing.clone());
        let tally = match deleter.delete_content(selection, cutoff).await {
            Ok(tally) => tally,
            Err(incomplete) => {
                warn!("Twitter pass stopped early: {}", incomplete);
                return Err(incomplete.into());
            }
        };

        Ok(Summary {
            platform: Platform::Twitter,
            tally,
        })
    }
}
