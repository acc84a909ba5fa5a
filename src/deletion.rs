//! The provider-independent deletion pass.
//!
//! A provider only has to list a page of the user's content given a cursor
//! and delete one item. Everything else lives here: walking the cursor,
//! filtering by cutoff and selection, waiting between pages, riding out
//! rate limits and keeping the tally.

use async_trait::async_trait;
use log::{debug, info, warn};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

use crate::content::{ContentItem, ContentKind, Cutoff, DeletionTally};
use crate::error::{DeleterError, Result};

/// A listing of the authenticated user's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Listing {
    /// Reddit submissions.
    Posts,
    /// Reddit comments.
    Comments,
    /// Twitter timeline (tweets and replies mixed).
    Timeline,
}

impl fmt::Display for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Listing::Posts => "posts",
            Listing::Comments => "comments",
            Listing::Timeline => "tweets",
        };
        f.write_str(name)
    }
}

/// One page of a listing.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub items: Vec<ContentItem>,
    /// Cursor for the next page. `None` or empty means this was the last one.
    pub next_cursor: Option<String>,
}

/// What a provider must offer for a deletion pass.
#[async_trait]
pub trait ContentApi: Send {
    /// Fetches the page of `listing` that starts at `cursor` (`None` for the first page).
    async fn list_page(&mut self, listing: Listing, cursor: Option<&str>) -> Result<Page>;

    /// Deletes a single item.
    async fn delete(&mut self, item: &ContentItem) -> Result<()>;
}

/// Timing policy for a provider.
#[derive(Debug, Clone)]
pub struct Pacing {
    /// Wait between consecutive page fetches.
    pub page_delay: Duration,
    /// Wait after HTTP 429 before retrying the same request. `None` makes a
    /// 429 an ordinary failure.
    pub rate_limit_wait: Option<Duration>,
    /// Consecutive rate-limit waits allowed for one delete before the item is abandoned.
    pub max_delete_rate_limit_waits: u32,
}

impl Pacing {
    /// Two seconds between pages, no rate-limit retry.
    pub fn reddit() -> Self {
        Pacing {
            page_delay: Duration::from_secs(2),
            rate_limit_wait: None,
            max_delete_rate_limit_waits: 0,
        }
    }

    /// Five seconds between pages, fifteen minutes on a 429.
    pub fn twitter() -> Self {
        Pacing {
            page_delay: Duration::from_secs(5),
            rate_limit_wait: Some(Duration::from_secs(15 * 60)),
            max_delete_rate_limit_waits: 3,
        }
    }

    /// The same policy with every wait set to zero.
    pub fn without_delays(mut self) -> Self {
        self.page_delay = Duration::ZERO;
        if self.rate_limit_wait.is_some() {
            self.rate_limit_wait = Some(Duration::ZERO);
        }
        self
    }
}

/// A pass that stopped on an unrecoverable fetch error.
#[derive(Debug, Error)]
#[error("{error} (after deleting {tally})")]
pub struct IncompletePass {
    /// Deletions made before the failure.
    pub tally: DeletionTally,
    #[source]
    pub error: DeleterError,
}

/// Sleeps for the rate-limit window, announcing it to the operator.
async fn wait_for_rate_limit(wait: Duration) {
    println!(
        "\nRate limit reached. Waiting for {} before continuing...",
        format_wait(wait)
    );
    tokio::time::sleep(wait).await;
}

fn format_wait(wait: Duration) -> String {
    let secs = wait.as_secs();
    if secs >= 60 && secs % 60 == 0 {
        format!("{}m", secs / 60)
    } else {
        format!("{}s", secs)
    }
}

/// Waits out `error` if it is a rate limit and the policy allows retrying.
///
/// Returns `true` when the caller should send the same request again.
pub(crate) async fn backoff_on_rate_limit(pacing: &Pacing, error: &DeleterError) -> bool {
    match pacing.rate_limit_wait {
        Some(wait) if error.is_rate_limited() => {
            warn!("{}, retrying after {:?}", error, wait);
            wait_for_rate_limit(wait).await;
            true
        }
        _ => false,
    }
}

async fn fetch_page<A: ContentApi + ?Sized>(
    api: &mut A,
    listing: Listing,
    cursor: Option<&str>,
    pacing: &Pacing,
) -> Result<Page> {
    loop {
        match api.list_page(listing, cursor).await {
            Ok(page) => return Ok(page),
            Err(e) => {
                if !backoff_on_rate_limit(pacing, &e).await {
                    return Err(e);
                }
                info!("Retrying {} page after rate limit", listing);
            }
        }
    }
}

/// Deletes `item`, waiting out rate limits up to the configured number of times.
///
/// A rate-limit wait never counts as a failed attempt; any other error
/// abandons the item immediately.
async fn delete_item<A: ContentApi + ?Sized>(
    api: &mut A,
    item: &ContentItem,
    pacing: &Pacing,
) -> Result<()> {
    let mut waits = 0;
    loop {
        match api.delete(item).await {
            Err(e) if e.is_rate_limited() => match pacing.rate_limit_wait {
                Some(wait) if waits < pacing.max_delete_rate_limit_waits => {
                    waits += 1;
                    wait_for_rate_limit(wait).await;
                }
                Some(_) => {
                    return Err(DeleterError::delete(
                        item.fullname(),
                        format!("still rate limited after {} waits", waits),
                    ))
                }
                None => return Err(e),
            },
            other => return other,
        }
    }
}

/// Walks every page of `listing`, deleting each item created before `cutoff`
/// whose kind `wanted` accepts.
///
/// Deletions are added to `tally` as they happen, so the caller keeps the
/// count even when the walk fails part-way.
///
/// # Errors
///
/// Returns the first fetch error. Delete errors are reported and skipped.
pub async fn sweep<A, F>(
    api: &mut A,
    listing: Listing,
    cutoff: &Cutoff,
    wanted: F,
    pacing: &Pacing,
    tally: &mut DeletionTally,
) -> Result<()>
where
    A: ContentApi + ?Sized,
    F: Fn(ContentKind) -> bool,
{
    info!("Starting {} sweep with cutoff {}", listing, cutoff);
    let mut cursor: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page = fetch_page(api, listing, cursor.as_deref(), pacing).await?;
        pages += 1;

        if page.items.is_empty() {
            info!("Page {} of {} is empty, stopping", pages, listing);
            break;
        }

        println!("Found {} {} in this page", page.items.len(), listing);

        for item in &page.items {
            println!(
                "Found {} from {} (ID: {})\nContent: {}",
                item.kind.label(),
                item.created_on(),
                item.id,
                item.preview()
            );

            if !cutoff.is_eligible(item.created_at) {
                debug!("Keeping {} {}: not before cutoff", item.kind.label(), item.id);
                continue;
            }
            if !wanted(item.kind) {
                debug!("Keeping {} {}: not selected", item.kind.label(), item.id);
                continue;
            }

            println!(
                "Attempting to delete {} (Fullname: {})",
                item.kind.label(),
                item.fullname()
            );
            match delete_item(api, item, pacing).await {
                Ok(()) => {
                    tally.record(item.kind);
                    println!(
                        "Successfully deleted {} from {}\n---",
                        item.kind.label(),
                        item.created_on()
                    );
                }
                Err(e) => {
                    warn!("Delete failed for {}: {}", item.fullname(), e);
                    println!("Error deleting {} {}: {}", item.kind.label(), item.fullname(), e);
                }
            }
        }

        match page.next_cursor {
            Some(next) if !next.is_empty() => {
                if cursor.as_deref() == Some(next.as_str()) {
                    warn!("Provider repeated cursor {} for {}, stopping", next, listing);
                    break;
                }
                cursor = Some(next);
            }
            _ => {
                info!("No continuation cursor after page {} of {}", pages, listing);
                break;
            }
        }

        tokio::time::sleep(pacing.page_delay).await;
    }

    info!("Finished {} sweep after {} page(s)", listing, pages);
    Ok(())
}
