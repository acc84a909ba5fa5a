//! Core Twitter API utilities.
//!
//! Every request is signed with OAuth 1.0a user-context credentials. HTTP
//! status codes are mapped onto [`DeleterError`] so the deletion pass can
//! tell a rate limit from a real failure.

use async_trait::async_trait;
use log::{debug, error, info};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;

use crate::config::TwitterCredentials;
use crate::content::{sanitize_for_logging, ContentItem};
use crate::deletion::{backoff_on_rate_limit, ContentApi, Listing, Page, Pacing};
use crate::error::{DeleterError, Result};
use crate::oauth::OAuth1Signer;

use super::parsing::{timeline_page, DeleteResponse, TimelineResponse, UserLookupResponse};

/// Production API host.
pub const TWITTER_API_BASE: &str = "https://api.x.com";

/// Tweets requested per timeline page.
pub const TIMELINE_PAGE_SIZE: u32 = 20;

/// An authenticated Twitter/X session bound to one user id.
#[derive(Debug)]
pub struct TwitterApi {
    client: Client,
    signer: OAuth1Signer,
    base: String,
    user_id: String,
    username: String,
}

/// Failed requests, before they are given a meaning by the caller.
enum Failure {
    /// Signing, transport or decoding failed.
    Request(String),
    Unauthorized,
    NotFound,
    RateLimited,
    Other(StatusCode),
}

impl TwitterApi {
    /// Signs in against the production API and resolves `username` to its id.
    pub async fn connect(credentials: &TwitterCredentials, pacing: &Pacing) -> Result<Self> {
        Self::connect_with(credentials, TWITTER_API_BASE, pacing).await
    }

    /// Builds the signed client and looks the configured user up.
    ///
    /// A 429 on the lookup is waited out according to `pacing`.
    ///
    /// # Errors
    ///
    /// - [`DeleterError::ConfigInvalid`] if credentials are incomplete
    /// - [`DeleterError::Auth`] on 401
    /// - [`DeleterError::NotFound`] on 404 or when the lookup returns no user
    pub async fn connect_with(
        credentials: &TwitterCredentials,
        base: &str,
        pacing: &Pacing,
    ) -> Result<Self> {
        credentials.validate()?;

        let mut api = TwitterApi {
            client: Client::new(),
            signer: OAuth1Signer::new(credentials),
            base: base.trim_end_matches('/').to_string(),
            user_id: String::new(),
            username: credentials.username.clone(),
        };

        let user_id = loop {
            match api.lookup_user_id().await {
                Ok(id) => break id,
                Err(e) => {
                    if !backoff_on_rate_limit(pacing, &e).await {
                        return Err(e);
                    }
                }
            }
        };

        info!("Resolved @{} to user id {}", api.username, user_id);
        api.user_id = user_id;
        Ok(api)
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Sends a signed request and decodes a JSON body on success.
    async fn signed_request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        params: &[(String, String)],
        operation_name: &str,
    ) -> std::result::Result<T, Failure> {
        let url = format!("{}{}", self.base, path);
        debug!("Making signed request for operation: {}", operation_name);

        let auth_header = self
            .signer
            .authorization_header(method.as_str(), &url, params)
            .map_err(|e| Failure::Request(e.to_string()))?;

        let response = self
            .client
            .request(method, &url)
            .header("Authorization", auth_header)
            .query(params)
            .send()
            .await
            .map_err(|e| Failure::Request(e.to_string()))?;

        let status = response.status();
        debug!(
            "Received response with status: {} for operation: {}",
            status, operation_name
        );

        if status.is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|e| Failure::Request(format!("malformed response: {}", e)));
        }

        let body = response.text().await.unwrap_or_default();
        error!("Operation '{}' failed - Status: {}", operation_name, status);
        debug!(
            "Error response for '{}': {}",
            operation_name,
            sanitize_for_logging(&body, 200)
        );

        Err(match status {
            StatusCode::UNAUTHORIZED => Failure::Unauthorized,
            StatusCode::NOT_FOUND => Failure::NotFound,
            StatusCode::TOO_MANY_REQUESTS => Failure::RateLimited,
            other => Failure::Other(other),
        })
    }

    async fn lookup_user_id(&self) -> Result<String> {
        info!("Looking up user by username: {}", self.username);
        let path = format!(
            "/2/users/by/username/{}",
            urlencoding::encode(&self.username)
        );

        let response: UserLookupResponse = match self
            .signed_request(Method::GET, &path, &[], "lookup_user")
            .await
        {
            Ok(body) => body,
            Err(Failure::Request(reason)) => {
                return Err(DeleterError::Auth(format!("user lookup failed: {}", reason)))
            }
            Err(Failure::Unauthorized) => {
                return Err(DeleterError::Auth(
                    "please check your API credentials and ensure they have the necessary permissions"
                        .to_string(),
                ))
            }
            Err(Failure::NotFound) => {
                return Err(DeleterError::NotFound(format!(
                    "user '{}' not found: please verify the username",
                    self.username
                )))
            }
            Err(Failure::RateLimited) => {
                return Err(DeleterError::RateLimited("user lookup".to_string()))
            }
            Err(Failure::Other(status)) => {
                return Err(DeleterError::Auth(format!(
                    "user lookup returned {}",
                    status
                )))
            }
        };

        match response.data {
            Some(user) => {
                debug!("Lookup matched @{}", user.username);
                Ok(user.id)
            }
            None => {
                let detail = response
                    .errors
                    .first()
                    .map(|p| format!("{}: {}", p.title, p.detail))
                    .unwrap_or_else(|| "no user data returned".to_string());
                Err(DeleterError::NotFound(format!(
                    "user '{}' not found ({})",
                    self.username, detail
                )))
            }
        }
    }
}

#[async_trait]
impl ContentApi for TwitterApi {
    async fn list_page(&mut self, listing: Listing, cursor: Option<&str>) -> Result<Page> {
        if listing != Listing::Timeline {
            return Err(DeleterError::fetch(
                listing.to_string(),
                "Twitter only has a timeline listing",
            ));
        }

        let mut params = vec![
            ("max_results".to_string(), TIMELINE_PAGE_SIZE.to_string()),
            (
                "tweet.fields".to_string(),
                "created_at,referenced_tweets,text".to_string(),
            ),
            ("expansions".to_string(), "referenced_tweets.id".to_string()),
        ];
        if let Some(token) = cursor {
            params.push(("pagination_token".to_string(), token.to_string()));
        }

        let path = format!("/2/users/{}/tweets", self.user_id);
        let response: TimelineResponse = match self
            .signed_request(Method::GET, &path, &params, "list_tweets")
            .await
        {
            Ok(body) => body,
            Err(Failure::Request(reason)) => return Err(DeleterError::fetch("tweets", reason)),
            Err(Failure::RateLimited) => {
                return Err(DeleterError::RateLimited("listing tweets".to_string()))
            }
            Err(Failure::Unauthorized) => {
                return Err(DeleterError::fetch("tweets", "unauthorized (401)"))
            }
            Err(Failure::NotFound) => return Err(DeleterError::fetch("tweets", "not found (404)")),
            Err(Failure::Other(status)) => {
                return Err(DeleterError::fetch("tweets", format!("Twitter returned {}", status)))
            }
        };

        debug!(
            "Timeline page reports {} result(s)",
            response.meta.result_count
        );
        Ok(timeline_page(response))
    }

    async fn delete(&mut self, item: &ContentItem) -> Result<()> {
        let path = format!("/2/tweets/{}", item.id);
        let response: DeleteResponse = match self
            .signed_request(Method::DELETE, &path, &[], "delete_tweet")
            .await
        {
            Ok(body) => body,
            Err(Failure::Request(reason)) => {
                return Err(DeleterError::delete(item.id.clone(), reason))
            }
            Err(Failure::RateLimited) => {
                return Err(DeleterError::RateLimited(format!("deleting {}", item.id)))
            }
            Err(Failure::Unauthorized) => {
                return Err(DeleterError::delete(item.id.clone(), "unauthorized (401)"))
            }
            Err(Failure::NotFound) => {
                return Err(DeleterError::delete(item.id.clone(), "not found (404)"))
            }
            Err(Failure::Other(status)) => {
                return Err(DeleterError::delete(
                    item.id.clone(),
                    format!("Twitter returned {}", status),
                ))
            }
        };

        match response.data {
            Some(data) if data.deleted => Ok(()),
            _ => Err(DeleterError::delete(
                item.id.clone(),
                "Twitter did not confirm the deletion",
            )),
        }
    }
}
