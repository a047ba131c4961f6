//! Object store collaborators: where document bytes come from.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::time::Duration;

use thiserror::Error;

use crate::DocumentRef;

#[derive(Error, Debug)]
pub enum RetrievalError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP status {0}")]
    Status(u16),
    #[error("object not found: {0}")]
    NotFound(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A store that can locate and download one document's bytes.
///
/// The extraction pipeline consumes only this signature and never learns
/// how the bytes were located (signed URL, direct path, local disk).
pub trait ObjectStore: Send + Sync {
    fn fetch_bytes<'a>(
        &'a self,
        reference: &'a DocumentRef,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>, RetrievalError>> + Send + 'a>>;
}

/// Fetch documents over HTTP from a pre-authenticated base URL.
///
/// One GET per document against `{base_url}/{encoded key}`, optionally
/// with a bearer token. Time-limited signed-URL schemes sit behind the
/// same contract: whatever granted access to `base_url` is the caller's
/// concern.
pub struct HttpObjectStore {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
    timeout: Duration,
}

impl HttpObjectStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            token: None,
            timeout: Duration::from_secs(60),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn object_url(&self, reference: &DocumentRef) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(reference.as_str())
        )
    }
}

impl ObjectStore for HttpObjectStore {
    fn fetch_bytes<'a>(
        &'a self,
        reference: &'a DocumentRef,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>, RetrievalError>> + Send + 'a>> {
        Box::pin(async move {
            let url = self.object_url(reference);

            let mut request = self.client.get(&url).timeout(self.timeout);
            if let Some(ref token) = self.token {
                request = request.bearer_auth(token);
            }

            let resp = request.send().await?;
            let status = resp.status();
            if status.as_u16() == 404 {
                return Err(RetrievalError::NotFound(reference.to_string()));
            }
            if !status.is_success() {
                return Err(RetrievalError::Status(status.as_u16()));
            }

            Ok(resp.bytes().await?.to_vec())
        })
    }
}

/// Serve documents from a local directory, keyed by relative path.
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ObjectStore for FsObjectStore {
    fn fetch_bytes<'a>(
        &'a self,
        reference: &'a DocumentRef,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>, RetrievalError>> + Send + 'a>> {
        Box::pin(async move {
            let path = self.root.join(reference.as_str());
            match std::fs::read(&path) {
                Ok(bytes) => Ok(bytes),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    Err(RetrievalError::NotFound(reference.to_string()))
                }
                Err(e) => Err(RetrievalError::Io(e)),
            }
        })
    }
}
