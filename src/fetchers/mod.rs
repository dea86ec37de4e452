use async_trait::async_trait;
use std::sync::Arc;
use url::Url;

use crate::error::FetchError;

mod cache;
mod request;

pub use cache::CachedFetcher;
pub use request::RequestFetcher;

/// A retrieved page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// URL after redirects; relative references on the page resolve against it
    pub final_url: Url,
    pub content: String,
    pub content_type: Option<String>,
}

/// Network transport used by the pipeline.
///
/// Implementations resolve a URL to its final location and content. The
/// pipeline does not care which HTTP client sits behind it.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError>;
}

#[async_trait]
impl<T: PageFetcher + ?Sized> PageFetcher for Arc<T> {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        (**self).fetch(url).await
    }
}

/// Parse user input into an http(s) URL.
pub fn parse_target_url(raw: &str) -> Result<Url, FetchError> {
    let url = Url::parse(raw.trim()).map_err(|source| FetchError::InvalidUrl {
        url: raw.to_string(),
        source,
    })?;
    ensure_supported_scheme(&url)?;
    Ok(url)
}

pub(crate) fn ensure_supported_scheme(url: &Url) -> Result<(), FetchError> {
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(FetchError::UnsupportedScheme(other.to_string())),
    }
}
