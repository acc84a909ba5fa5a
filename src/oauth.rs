//! OAuth authentication module.
//!
//! Reddit requests carry an OAuth 2.0 bearer token obtained through the
//! password grant. Twitter/X requests are signed per request with OAuth 1.0a
//! user-context credentials (HMAC-SHA1).

use base64::Engine;
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use rand::distributions::Alphanumeric;
use rand::Rng;
use sha1::Sha1;

use crate::config::TwitterCredentials;
use crate::error::{DeleterError, Result};

type HmacSha1 = Hmac<Sha1>;

/// RFC 3986 unreserved characters are left alone; everything else is encoded.
const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Builds the Authorization header for an OAuth 2.0 bearer token.
///
/// # Example
///
/// ```rust
/// use del_socials::build_bearer_auth_header;
///
/// let header = build_bearer_auth_header("your_access_token");
/// assert_eq!(header, "Bearer your_access_token");
/// ```
pub fn build_bearer_auth_header(access_token: &str) -> String {
    format!("Bearer {}", access_token)
}

/// Percent-encodes a value the way OAuth 1.0a requires.
pub fn oauth_encode(value: &str) -> String {
    utf8_percent_encode(value, OAUTH_ENCODE_SET).to_string()
}

/// Signs Twitter/X requests with OAuth 1.0a user-context credentials.
#[derive(Clone)]
pub struct OAuth1Signer {
    consumer_key: String,
    consumer_secret: String,
    token: String,
    token_secret: String,
}

impl std::fmt::Debug for OAuth1Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuth1Signer")
            .field("consumer_key", &crate::config::mask_secret(&self.consumer_key))
            .field("token", &crate::config::mask_secret(&self.token))
            .finish_non_exhaustive()
    }
}

impl OAuth1Signer {
    pub fn new(credentials: &TwitterCredentials) -> Self {
        OAuth1Signer {
            consumer_key: credentials.api_key.clone(),
            consumer_secret: credentials.api_key_secret.clone(),
            token: credentials.access_token.clone(),
            token_secret: credentials.access_token_secret.clone(),
        }
    }

    /// Builds the `Authorization` header for one request.
    ///
    /// `base_url` must not carry a query string; its query parameters go in
    /// `params` so they take part in the signature.
    pub fn authorization_header(
        &self,
        method: &str,
        base_url: &str,
        params: &[(String, String)],
    ) -> Result<String> {
        let nonce: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(32)
            .map(char::from)
            .collect();
        let timestamp = chrono::Utc::now().timestamp().to_string();
        self.header_with(method, base_url, params, &nonce, &timestamp)
    }

    pub(crate) fn header_with(
        &self,
        method: &str,
        base_url: &str,
        params: &[(String, String)],
        nonce: &str,
        timestamp: &str,
    ) -> Result<String> {
        let mut oauth_params = vec![
            ("oauth_consumer_key".to_string(), self.consumer_key.clone()),
            ("oauth_nonce".to_string(), nonce.to_string()),
            (
                "oauth_signature_method".to_string(),
                "HMAC-SHA1".to_string(),
            ),
            ("oauth_timestamp".to_string(), timestamp.to_string()),
            ("oauth_token".to_string(), self.token.clone()),
            ("oauth_version".to_string(), "1.0".to_string()),
        ];

        let signature = self.signature(method, base_url, params, &oauth_params)?;
        oauth_params.push(("oauth_signature".to_string(), signature));
        oauth_params.sort();

        let fields: Vec<String> = oauth_params
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", oauth_encode(k), oauth_encode(v)))
            .collect();
        Ok(format!("OAuth {}", fields.join(", ")))
    }

    /// HMAC-SHA1 over the RFC 5849 signature base string, base64 encoded.
    fn signature(
        &self,
        method: &str,
        base_url: &str,
        params: &[(String, String)],
        oauth_params: &[(String, String)],
    ) -> Result<String> {
        let mut encoded: Vec<(String, String)> = params
            .iter()
            .chain(oauth_params.iter())
            .map(|(k, v)| (oauth_encode(k), oauth_encode(v)))
            .collect();
        encoded.sort();

        let parameter_string = encoded
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");

        let base_string = format!(
            "{}&{}&{}",
            method.to_uppercase(),
            oauth_encode(base_url),
            oauth_encode(&parameter_string)
        );
        let signing_key = format!(
            "{}&{}",
            oauth_encode(&self.consumer_secret),
            oauth_encode(&self.token_secret)
        );

        let mut mac = HmacSha1::new_from_slice(signing_key.as_bytes())
            .map_err(|e| DeleterError::Auth(format!("HMAC init failed: {}", e)))?;
        mac.update(base_string.as_bytes());
        Ok(base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes()))
    }
}
