//! Reddit REST client.
//!
//! Authenticates with the OAuth 2.0 password grant and talks to the
//! `oauth.reddit.com` listing and delete endpoints.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, error, info, warn};
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::config::{mask_secret, RedditCredentials};
use crate::content::{sanitize_for_logging, ContentItem, ContentKind};
use crate::deletion::{ContentApi, Listing, Page};
use crate::error::{DeleterError, Result};
use crate::oauth::build_bearer_auth_header;

/// Host that issues access tokens.
pub const REDDIT_AUTH_BASE: &str = "https://www.reddit.com";
/// Host that serves authenticated API calls.
pub const REDDIT_OAUTH_BASE: &str = "https://oauth.reddit.com";

/// Items requested per listing page (Reddit's maximum).
pub const PAGE_LIMIT: u32 = 100;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Identity {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ListingResponse {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    after: Option<String>,
    #[serde(default)]
    children: Vec<Thing>,
}

#[derive(Debug, Deserialize)]
struct Thing {
    data: ThingData,
}

#[derive(Debug, Deserialize)]
struct ThingData {
    id: String,
    created_utc: f64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    body: String,
}

/// An authenticated Reddit session.
pub struct RedditApi {
    client: Client,
    oauth_base: String,
    access_token: String,
    user_agent: String,
    username: String,
}

impl std::fmt::Debug for RedditApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedditApi")
            .field("oauth_base", &self.oauth_base)
            .field("access_token", &mask_secret(&self.access_token))
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl RedditApi {
    /// Logs in against the production Reddit hosts.
    pub async fn authenticate(credentials: &RedditCredentials) -> Result<Self> {
        Self::authenticate_with(credentials, REDDIT_AUTH_BASE, REDDIT_OAUTH_BASE).await
    }

    /// Exchanges the account credentials for a bearer token.
    ///
    /// # Errors
    ///
    /// - [`DeleterError::ConfigInvalid`] if credentials are incomplete
    /// - [`DeleterError::Auth`] on a non-2xx response or a response without a token
    pub async fn authenticate_with(
        credentials: &RedditCredentials,
        auth_base: &str,
        oauth_base: &str,
    ) -> Result<Self> {
        credentials.validate()?;
        let user_agent = credentials.effective_user_agent();
        let client = Client::new();

        let url = format!("{}/api/v1/access_token", auth_base.trim_end_matches('/'));
        info!("Requesting Reddit access token for {}", credentials.username);

        let form = [
            ("grant_type", "password"),
            ("username", credentials.username.as_str()),
            ("password", credentials.password.as_str()),
        ];
        let response = client
            .post(&url)
            .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
            .header("User-Agent", &user_agent)
            .form(&form)
            .send()
            .await
            .map_err(|e| DeleterError::Auth(format!("token request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Reddit token request failed - Status: {}", status);
            debug!("Token error response: {}", sanitize_for_logging(&body, 200));
            return Err(DeleterError::Auth(format!(
                "Reddit token endpoint returned {}",
                status
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| DeleterError::Auth(format!("malformed token response: {}", e)))?;

        let access_token = match (token.access_token, token.error) {
            (Some(access_token), _) if !access_token.is_empty() => access_token,
            (_, Some(reason)) => {
                error!("Reddit rejected the password grant: {}", reason);
                return Err(DeleterError::Auth(format!(
                    "Reddit rejected the credentials: {}",
                    reason
                )));
            }
            _ => {
                return Err(DeleterError::Auth(
                    "token response did not contain an access token".to_string(),
                ))
            }
        };

        info!("Obtained Reddit access token");
        Ok(RedditApi {
            client,
            oauth_base: oauth_base.trim_end_matches('/').to_string(),
            access_token,
            user_agent,
            username: credentials.username.clone(),
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Asks Reddit who the token belongs to.
    pub async fn verify_identity(&self) -> Result<String> {
        let url = format!("{}/api/v1/me", self.oauth_base);
        let response = self
            .client
            .get(&url)
            .header("Authorization", build_bearer_auth_header(&self.access_token))
            .header("User-Agent", &self.user_agent)
            .send()
            .await
            .map_err(|e| DeleterError::Auth(format!("identity request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeleterError::Auth(format!(
                "identity check returned {}",
                status
            )));
        }

        let identity: Identity = response
            .json()
            .await
            .map_err(|e| DeleterError::Auth(format!("malformed identity response: {}", e)))?;
        info!("Authenticated with Reddit as {}", identity.name);
        Ok(identity.name)
    }

    fn listing_path(listing: Listing) -> Result<&'static str> {
        match listing {
            Listing::Posts => Ok("submitted"),
            Listing::Comments => Ok("comments"),
            Listing::Timeline => Err(DeleterError::fetch(
                listing.to_string(),
                "Reddit has no timeline listing",
            )),
        }
    }
}

fn to_item(thing: ThingData, kind: ContentKind) -> Option<ContentItem> {
    let created_at = DateTime::<Utc>::from_timestamp(thing.created_utc as i64, 0);
    let Some(created_at) = created_at else {
        warn!(
            "Skipping {} {} with invalid created_utc {}",
            kind.label(),
            thing.id,
            thing.created_utc
        );
        return None;
    };

    let text = match kind {
        ContentKind::Post => thing.title,
        _ => thing.body,
    };

    Some(ContentItem {
        id: thing.id,
        kind,
        created_at,
        text,
    })
}

#[async_trait]
impl ContentApi for RedditApi {
    async fn list_page(&mut self, listing: Listing, cursor: Option<&str>) -> Result<Page> {
        let path = Self::listing_path(listing)?;
        let kind = match listing {
            Listing::Posts => ContentKind::Post,
            _ => ContentKind::Comment,
        };

        let url = format!(
            "{}/user/{}/{}",
            self.oauth_base,
            urlencoding::encode(&self.username),
            path
        );
        let mut query = vec![
            ("limit", PAGE_LIMIT.to_string()),
            ("raw_json", "1".to_string()),
        ];
        if let Some(after) = cursor {
            query.push(("after", after.to_string()));
        }

        debug!("Fetching Reddit {} page after {:?}", listing, cursor);
        let response = self
            .client
            .get(&url)
            .header("Authorization", build_bearer_auth_header(&self.access_token))
            .header("User-Agent", &self.user_agent)
            .query(&query)
            .send()
            .await
            .map_err(|e| DeleterError::fetch(listing.to_string(), e))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(DeleterError::RateLimited(format!("listing {}", listing)));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!("Listing error response: {}", sanitize_for_logging(&body, 200));
            return Err(DeleterError::fetch(
                listing.to_string(),
                format!("Reddit returned {}", status),
            ));
        }

        let body: ListingResponse = response
            .json()
            .await
            .map_err(|e| DeleterError::fetch(listing.to_string(), e))?;

        let items = body
            .data
            .children
            .into_iter()
            .filter_map(|thing| to_item(thing.data, kind))
            .collect();

        Ok(Page {
            items,
            next_cursor: body.data.after,
        })
    }

    async fn delete(&mut self, item: &ContentItem) -> Result<()> {
        let fullname = item.fullname();
        let url = format!("{}/api/del", self.oauth_base);

        let response = self
            .client
            .post(&url)
            .header("Authorization", build_bearer_auth_header(&self.access_token))
            .header("User-Agent", &self.user_agent)
            .form(&[("id", fullname.as_str())])
            .send()
            .await
            .map_err(|e| DeleterError::delete(fullname.clone(), e))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(DeleterError::RateLimited(format!("deleting {}", fullname)));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DeleterError::delete(
                fullname,
                format!(
                    "delete request failed: {} - {}",
                    status,
                    sanitize_for_logging(&body, 200)
                ),
            ));
        }

        debug!("Reddit accepted delete of {}", fullname);
        Ok(())
    }
}
