//! OAuth2 access tokens: exchange at the token endpoint and cache until near expiry.

use serde::Deserialize;
use std::fmt;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use super::Credentials;
use crate::retry::{run_with_retry, RetryPolicy};
use crate::store::{transport, StoreError};

/// Refresh this long before the server-reported expiry.
const REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// Token endpoint response.
#[derive(Clone, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub token_type: Option<String>,
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("access_token", &"<redacted>")
            .field("expires_in", &self.expires_in)
            .field("token_type", &self.token_type)
            .finish()
    }
}

pub(crate) fn unix_now() -> Result<u64, StoreError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|e| StoreError::Auth(format!("system clock before unix epoch: {}", e)))
}

/// POST a form body to `token_uri` and decode the token response.
pub(crate) fn exchange(
    token_uri: &str,
    form_body: &str,
    policy: &RetryPolicy,
) -> Result<AccessToken, StoreError> {
    let headers = ["Content-Type: application/x-www-form-urlencoded".to_string()];
    run_with_retry(policy, "token exchange", || {
        let body = transport::fetch_bytes(token_uri, &headers, Some(form_body))?;
        let token: AccessToken = serde_json::from_slice(&body)?;
        Ok(token)
    })
}

struct Cached {
    token: AccessToken,
    fetched_at: Instant,
}

impl Cached {
    fn is_fresh(&self) -> bool {
        match self.token.expires_in {
            None => true,
            Some(secs) => {
                self.fetched_at.elapsed() + REFRESH_MARGIN < Duration::from_secs(secs)
            }
        }
    }
}

/// Holds credentials and the current access token; refreshes on demand.
pub struct TokenCache {
    credentials: Credentials,
    policy: RetryPolicy,
    current: Option<Cached>,
}

impl TokenCache {
    pub fn new(credentials: Credentials, policy: RetryPolicy) -> Self {
        Self {
            credentials,
            policy,
            current: None,
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Current bearer token, fetching a new one if none is cached or it is about to expire.
    pub fn bearer(&mut self) -> Result<String, StoreError> {
        if let Some(cached) = &self.current {
            if cached.is_fresh() {
                return Ok(cached.token.access_token.clone());
            }
            tracing::debug!("access token near expiry, refreshing");
        }
        let token = self.credentials.fetch_token(&self.policy)?;
        let bearer = token.access_token.clone();
        self.current = Some(Cached {
            token,
            fetched_at: Instant::now(),
        });
        Ok(bearer)
    }
}
