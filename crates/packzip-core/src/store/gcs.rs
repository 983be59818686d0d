//! Google Cloud Storage JSON API client.
//!
//! Listing: `GET {endpoint}/storage/v1/b/{bucket}/o?prefix=...`, following
//! `nextPageToken`. Download: the object's `mediaLink`, or
//! `{endpoint}/download/storage/v1/b/{bucket}/o/{name}?alt=media`.

use serde::Deserialize;
use std::fs::{self, File};
use std::path::Path;
use url::Url;

use super::{temp_path, transport, Blob, ObjectStore, StoreError};
use crate::auth::{Credentials, TokenCache};
use crate::retry::{run_with_retry, RetryPolicy};

pub const DEFAULT_ENDPOINT: &str = "https://storage.googleapis.com";

const LIST_FIELDS: &str = "items(name,size,mediaLink,generation),nextPageToken";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ObjectResource {
    name: String,
    #[serde(default)]
    size: Option<String>,
    #[serde(default)]
    media_link: Option<String>,
    #[serde(default)]
    generation: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListPage {
    #[serde(default)]
    items: Vec<ObjectResource>,
    #[serde(default)]
    next_page_token: Option<String>,
}

impl From<ObjectResource> for Blob {
    fn from(o: ObjectResource) -> Self {
        Blob {
            size: o.size.as_deref().and_then(|s| s.parse().ok()),
            name: o.name,
            media_link: o.media_link,
            generation: o.generation,
        }
    }
}

/// A bucket in Google Cloud Storage.
pub struct GcsStore {
    bucket: String,
    endpoint: String,
    tokens: TokenCache,
    retry: RetryPolicy,
}

impl GcsStore {
    pub fn new(bucket: impl Into<String>, credentials: Credentials) -> Self {
        let retry = RetryPolicy::default();
        Self {
            bucket: bucket.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            tokens: TokenCache::new(credentials, retry),
            retry,
        }
    }

    /// Point at another API endpoint (emulator, test server).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self.tokens = TokenCache::new(self.tokens.credentials().clone(), retry);
        self
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    fn endpoint_url(&self, segments: &[&str]) -> Result<Url, StoreError> {
        let mut url = Url::parse(&self.endpoint)
            .map_err(|e| StoreError::Url(format!("{}: {}", self.endpoint, e)))?;
        url.path_segments_mut()
            .map_err(|_| StoreError::Url(format!("{}: cannot be a base", self.endpoint)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn list_url(&self, prefix: &str, page_token: Option<&str>) -> Result<String, StoreError> {
        let mut url = self.endpoint_url(&["storage", "v1", "b", &self.bucket, "o"])?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("prefix", prefix);
            query.append_pair("fields", LIST_FIELDS);
            if let Some(token) = page_token {
                query.append_pair("pageToken", token);
            }
        }
        Ok(url.into())
    }

    fn media_url(&self, blob: &Blob) -> Result<String, StoreError> {
        if let Some(link) = &blob.media_link {
            return Ok(link.clone());
        }
        let mut url =
            self.endpoint_url(&["download", "storage", "v1", "b", &self.bucket, "o", &blob.name])?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("alt", "media");
            if let Some(generation) = &blob.generation {
                query.append_pair("generation", generation);
            }
        }
        Ok(url.into())
    }
}

/// Built per attempt, so a retry after a long backoff picks up a refreshed token.
fn auth_headers(tokens: &mut TokenCache) -> Result<Vec<String>, StoreError> {
    Ok(vec![format!("Authorization: Bearer {}", tokens.bearer()?)])
}

impl ObjectStore for GcsStore {
    fn list_blobs(&mut self, prefix: &str) -> Result<Vec<Blob>, StoreError> {
        let mut blobs = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let url = self.list_url(prefix, page_token.as_deref())?;
            let tokens = &mut self.tokens;
            let page: ListPage = run_with_retry(&self.retry, "list objects", || {
                let headers = auth_headers(tokens)?;
                let body = transport::fetch_bytes(&url, &headers, None)?;
                Ok(serde_json::from_slice(&body)?)
            })?;
            blobs.extend(page.items.into_iter().map(Blob::from));
            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }
        tracing::debug!(
            "gs://{}/{}*: {} object(s)",
            self.bucket,
            prefix,
            blobs.len()
        );
        Ok(blobs)
    }

    fn download_to_path(&mut self, blob: &Blob, dest: &Path) -> Result<u64, StoreError> {
        let url = self.media_url(blob)?;
        let part = temp_path(dest);

        let tokens = &mut self.tokens;
        let what = format!("download {}", blob.name);
        let result = run_with_retry(&self.retry, &what, || {
            let headers = auth_headers(tokens)?;
            let mut file = File::create(&part)?;
            let received = transport::fetch_to_file(&url, &headers, &mut file)?;
            if let Some(expected) = blob.size {
                if received != expected {
                    return Err(StoreError::PartialTransfer { expected, received });
                }
            }
            file.sync_all()?;
            Ok(received)
        });

        match result {
            Ok(bytes) => {
                fs::rename(&part, dest)?;
                Ok(bytes)
            }
            Err(e) => {
                let _ = fs::remove_file(&part);
                Err(e)
            }
        }
    }
}
