//! Object-store error type, kept typed so the retry layer can classify it.

/// Failure talking to the object store (or its token endpoint).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Curl reported an error (timeout, connection, etc.).
    #[error("curl: {0}")]
    Curl(#[from] curl::Error),
    /// HTTP response had a non-2xx status.
    #[error("HTTP {status} from {url}")]
    Http { status: u32, url: String },
    /// Transfer completed with fewer bytes than the object size.
    #[error("partial transfer: expected {expected} bytes, got {received}")]
    PartialTransfer { expected: u64, received: u64 },
    /// Response body was not the JSON we expected.
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
    /// Local file write failed. Not retried.
    #[error("storage: {0}")]
    Io(#[from] std::io::Error),
    /// Credentials could not produce an access token.
    #[error("auth: {0}")]
    Auth(String),
    /// Endpoint or object URL could not be built.
    #[error("invalid url: {0}")]
    Url(String),
}
