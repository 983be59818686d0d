//! Service-account keys: RS256 JWT assertion for the OAuth2 jwt-bearer grant.

use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::store::StoreError;

/// Read-only access is all we need to list and fetch packs.
pub const READ_ONLY_SCOPE: &str = "https://www.googleapis.com/auth/devstorage.read_only";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: u64 = 3600;

pub(crate) fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

/// The fields of a service-account JSON key file we use.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    #[serde(default)]
    pub project_id: Option<String>,
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key_id", &self.private_key_id)
            .field("token_uri", &self.token_uri)
            .field("project_id", &self.project_id)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Claims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: u64,
    pub exp: u64,
}

impl ServiceAccountKey {
    /// Signed JWT asserting this account, issued at `now_unix`.
    pub fn assertion(&self, now_unix: u64) -> Result<String, StoreError> {
        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.private_key_id.clone();

        let claims = Claims {
            iss: self.client_email.clone(),
            scope: READ_ONLY_SCOPE.to_string(),
            aud: self.token_uri.clone(),
            iat: now_unix,
            exp: now_unix + ASSERTION_LIFETIME_SECS,
        };

        let key = EncodingKey::from_rsa_pem(self.private_key.as_bytes()).map_err(|e| {
            StoreError::Auth(format!("invalid private key for {}: {}", self.client_email, e))
        })?;
        jsonwebtoken::encode(&header, &claims, &key)
            .map_err(|e| StoreError::Auth(format!("sign assertion: {}", e)))
    }

    /// `application/x-www-form-urlencoded` body for the token endpoint.
    pub fn token_request_body(&self, now_unix: u64) -> Result<String, StoreError> {
        let assertion = self.assertion(now_unix)?;
        Ok(url::form_urlencoded::Serializer::new(String::new())
            .append_pair("grant_type", JWT_BEARER_GRANT)
            .append_pair("assertion", &assertion)
            .finish())
    }
}
