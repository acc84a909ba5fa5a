//! Content model shared by the Reddit and Twitter flows.
//!
//! Items, the cutoff they are judged against, the operator's content-type
//! selection, and the running tally of deletions.

use chrono::{DateTime, NaiveDate, Utc};
use std::fmt;
use std::str::FromStr;

use crate::error::DeleterError;

/// What a [`ContentItem`] is on its provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Post,
    Comment,
    Tweet,
    Reply,
}

impl ContentKind {
    /// Lower-case name used in progress output.
    pub fn label(self) -> &'static str {
        match self {
            ContentKind::Post => "post",
            ContentKind::Comment => "comment",
            ContentKind::Tweet => "tweet",
            ContentKind::Reply => "reply",
        }
    }

    /// Comments and replies are counted in the second tally column.
    pub fn is_secondary(self) -> bool {
        matches!(self, ContentKind::Comment | ContentKind::Reply)
    }
}

/// A post, comment, tweet or reply as returned by a listing call.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentItem {
    /// Provider id without any type prefix.
    pub id: String,
    pub kind: ContentKind,
    pub created_at: DateTime<Utc>,
    /// Title for posts, body for comments, text for tweets.
    pub text: String,
}

impl ContentItem {
    /// Reddit's typed identifier: `t3_<id>` for posts, `t1_<id>` for comments.
    ///
    /// Tweets have no fullname and return their plain id.
    pub fn fullname(&self) -> String {
        match self.kind {
            ContentKind::Post => format!("t3_{}", self.id),
            ContentKind::Comment => format!("t1_{}", self.id),
            ContentKind::Tweet | ContentKind::Reply => self.id.clone(),
        }
    }

    /// The creation date as `YYYY-MM-DD`.
    pub fn created_on(&self) -> String {
        self.created_at.format("%Y-%m-%d").to_string()
    }

    /// The item text made safe for a single progress line.
    pub fn preview(&self) -> String {
        sanitize_for_logging(&self.text, 120)
    }
}

/// The exclusive upper bound on creation time for deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cutoff(DateTime<Utc>);

impl Cutoff {
    /// Midnight UTC at the start of `date`.
    pub fn from_date(date: NaiveDate) -> Self {
        Cutoff(date.and_time(chrono::NaiveTime::MIN).and_utc())
    }

    /// True iff `created_at` is strictly before the cutoff.
    pub fn is_eligible(&self, created_at: DateTime<Utc>) -> bool {
        created_at < self.0
    }
}

impl fmt::Display for Cutoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Which Reddit content the operator wants gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedditSelection {
    All,
    Posts,
    Comments,
}

impl RedditSelection {
    /// Menu entries, in display order.
    pub const OPTIONS: [&'static str; 3] = ["all", "posts", "comments"];

    pub fn includes(self, kind: ContentKind) -> bool {
        match self {
            RedditSelection::All => matches!(kind, ContentKind::Post | ContentKind::Comment),
            RedditSelection::Posts => kind == ContentKind::Post,
            RedditSelection::Comments => kind == ContentKind::Comment,
        }
    }
}

impl FromStr for RedditSelection {
    type Err = DeleterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(RedditSelection::All),
            "posts" => Ok(RedditSelection::Posts),
            "comments" => Ok(RedditSelection::Comments),
            other => Err(DeleterError::InvalidChoice(format!(
                "unknown Reddit content type '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for RedditSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RedditSelection::All => "all",
            RedditSelection::Posts => "posts",
            RedditSelection::Comments => "comments",
        };
        f.write_str(name)
    }
}

/// Which Twitter content the operator wants gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TwitterSelection {
    All,
    Tweets,
    Replies,
}

impl TwitterSelection {
    pub const OPTIONS: [&'static str; 3] = ["all", "tweets", "replies"];

    pub fn includes(self, kind: ContentKind) -> bool {
        match self {
            TwitterSelection::All => matches!(kind, ContentKind::Tweet | ContentKind::Reply),
            TwitterSelection::Tweets => kind == ContentKind::Tweet,
            TwitterSelection::Replies => kind == ContentKind::Reply,
        }
    }
}

impl FromStr for TwitterSelection {
    type Err = DeleterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(TwitterSelection::All),
            "tweets" => Ok(TwitterSelection::Tweets),
            "replies" => Ok(TwitterSelection::Replies),
            other => Err(DeleterError::InvalidChoice(format!(
                "unknown Twitter content type '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for TwitterSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TwitterSelection::All => "all",
            TwitterSelection::Tweets => "tweets",
            TwitterSelection::Replies => "replies",
        };
        f.write_str(name)
    }
}

/// Deletions counted so far: posts or tweets in `primary`, comments or
/// replies in `secondary`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeletionTally {
    pub primary: usize,
    pub secondary: usize,
}

impl DeletionTally {
    pub fn record(&mut self, kind: ContentKind) {
        if kind.is_secondary() {
            self.secondary += 1;
        } else {
            self.primary += 1;
        }
    }

    pub fn total(&self) -> usize {
        self.primary + self.secondary
    }
}

impl fmt::Display for DeletionTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} + {} items", self.primary, self.secondary)
    }
}

/// Sanitizes text for safe logging by truncating and escaping control characters.
///
/// Newlines and tabs become spaces, other control characters become `?`, and
/// anything longer than `max_chars` is cut with a note of the original size.
pub fn sanitize_for_logging(text: &str, max_chars: usize) -> String {
    let sanitized: String = text
        .chars()
        .map(|c| match c {
            '\n' | '\r' | '\t' => ' ',
            c if c.is_control() => '?',
            c => c,
        })
        .collect();

    if sanitized.chars().count() > max_chars {
        let kept: String = sanitized.chars().take(max_chars).collect();
        format!("{}... [truncated, {} total bytes]", kept, text.len())
    } else {
        sanitized
    }
}
