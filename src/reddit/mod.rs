//! Reddit integration.
//!
//! [`RedditApi`] is the HTTP binding; [`RedditDeleter`] runs the posts and
//! comments passes over any [`ContentApi`].

mod api;

pub use api::{RedditApi, PAGE_LIMIT, REDDIT_AUTH_BASE, REDDIT_OAUTH_BASE};

use log::info;

use crate::content::{ContentKind, Cutoff, DeletionTally, RedditSelection};
use crate::deletion::{sweep, ContentApi, IncompletePass, Listing, Pacing};

/// Deletes a Reddit user's posts and comments older than a cutoff.
pub struct RedditDeleter<A: ContentApi> {
    api: A,
    pacing: Pacing,
}

impl<A: ContentApi> RedditDeleter<A> {
    pub fn new(api: A) -> Self {
        Self::with_pacing(api, Pacing::reddit())
    }

    pub fn with_pacing(api: A, pacing: Pacing) -> Self {
        RedditDeleter { api, pacing }
    }

    pub fn into_api(self) -> A {
        self.api
    }

    /// Runs the posts pass then the comments pass, as `selection` allows.
    ///
    /// Returns `(posts, comments)` deleted in the tally's primary and
    /// secondary columns.
    ///
    /// # Errors
    ///
    /// A failed page fetch stops everything; the error carries the tally so far.
    pub async fn delete_content(
        &mut self,
        selection: RedditSelection,
        cutoff: Cutoff,
    ) -> Result<DeletionTally, IncompletePass> {
        let mut tally = DeletionTally::default();

        for (listing, kind) in [
            (Listing::Posts, ContentKind::Post),
            (Listing::Comments, ContentKind::Comment),
        ] {
            if !selection.includes(kind) {
                continue;
            }

            info!("Deleting Reddit {} before {}", listing, cutoff);
            if let Err(error) = sweep(
                &mut self.api,
                listing,
                &cutoff,
                |k| selection.includes(k),
                &self.pacing,
                &mut tally,
            )
            .await
            {
                return Err(IncompletePass { tally, error });
            }
        }

        Ok(tally)
    }
}
