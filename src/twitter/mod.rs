//! Twitter/X API integration module.
//!
//! [`TwitterApi`] signs requests with OAuth 1.0a and maps the v2 endpoints
//! onto [`ContentApi`]; [`TwitterDeleter`] runs the timeline pass.

mod api;
mod parsing;

pub use api::{TwitterApi, TIMELINE_PAGE_SIZE, TWITTER_API_BASE};

#[cfg(test)]
pub(crate) use parsing::{is_reply, timeline_page, TimelineResponse};

use log::info;

use crate::content::{Cutoff, DeletionTally, TwitterSelection};
use crate::deletion::{sweep, ContentApi, IncompletePass, Listing, Pacing};

/// Deletes a Twitter user's tweets and replies older than a cutoff.
pub struct TwitterDeleter<A: ContentApi> {
    api: A,
    pacing: Pacing,
}

impl<A: ContentApi> TwitterDeleter<A> {
    pub fn new(api: A) -> Self {
        Self::with_pacing(api, Pacing::twitter())
    }

    pub fn with_pacing(api: A, pacing: Pacing) -> Self {
        TwitterDeleter { api, pacing }
    }

    pub fn into_api(self) -> A {
        self.api
    }

    /// Walks the user's timeline once, deleting tweets and/or replies per
    /// `selection`.
    ///
    /// Returns tweets deleted in the tally's primary column and replies in
    /// the secondary one.
    ///
    /// # Errors
    ///
    /// A failed page fetch (other than a rate limit) stops the pass; the
    /// error carries the tally so far.
    pub async fn delete_content(
        &mut self,
        selection: TwitterSelection,
        cutoff: Cutoff,
    ) -> Result<DeletionTally, IncompletePass> {
        let mut tally = DeletionTally::default();
        info!("Deleting Twitter {} before {}", selection, cutoff);

        match sweep(
            &mut self.api,
            Listing::Timeline,
            &cutoff,
            |kind| selection.includes(kind),
            &self.pacing,
            &mut tally,
        )
        .await
        {
            Ok(()) => Ok(tally),
            Err(error) => Err(IncompletePass { tally, error }),
        }
    }
}
