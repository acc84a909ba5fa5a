//! Response parsing for the Twitter API v2 endpoints.
//!
//! Turns timeline pages into [`ContentItem`]s, classifying each tweet as an
//! original or a reply from its referenced-tweet metadata.

use chrono::{DateTime, Utc};
use log::warn;
use serde::Deserialize;

use crate::content::{ContentItem, ContentKind};
use crate::deletion::Page;

#[derive(Debug, Deserialize)]
pub(crate) struct UserLookupResponse {
    pub data: Option<UserData>,
    #[serde(default)]
    pub errors: Vec<ApiProblem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserData {
    pub id: String,
    #[serde(default)]
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiProblem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub detail: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TimelineResponse {
    #[serde(default)]
    pub data: Vec<TweetData>,
    #[serde(default)]
    pub meta: TimelineMeta,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct TimelineMeta {
    pub next_token: Option<String>,
    #[serde(default)]
    pub result_count: u32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TweetData {
    pub id: Option<String>,
    #[serde(default)]
    pub text: String,
    pub created_at: Option<DateTime<Utc>>,
    pub referenced_tweets: Option<Vec<ReferencedTweet>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReferencedTweet {
    #[serde(rename = "type")]
    pub relation: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DeleteResponse {
    pub data: Option<DeleteData>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DeleteData {
    pub deleted: bool,
}

/// A tweet is a reply iff one of its referenced tweets is `replied_to`.
///
/// Quotes and retweets reference other tweets too but stay originals.
pub(crate) fn is_reply(tweet: &TweetData) -> bool {
    tweet
        .referenced_tweets
        .as_deref()
        .unwrap_or_default()
        .iter()
        .any(|r| r.relation == "replied_to")
}

/// Converts a timeline response into a page.
///
/// Tweets without an id or creation time cannot be judged against the
/// cutoff and are dropped.
pub(crate) fn timeline_page(response: TimelineResponse) -> Page {
    let items = response
        .data
        .into_iter()
        .filter_map(|tweet| {
            let kind = if is_reply(&tweet) {
                ContentKind::Reply
            } else {
                ContentKind::Tweet
            };
            let id = match tweet.id {
                Some(id) if !id.is_empty() => id,
                _ => {
                    warn!("Skipping tweet without an id");
                    return None;
                }
            };
            let Some(created_at) = tweet.created_at else {
                warn!("Tweet {} missing created_at field", id);
                return None;
            };
            Some(ContentItem {
                id,
                kind,
                created_at,
                text: tweet.text,
            })
        })
        .collect();

    Page {
        items,
        next_cursor: response.meta.next_token.filter(|t| !t.is_empty()),
    }
}
