use async_trait::async_trait;
use log::debug;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;
use url::Url;

use super::{FetchedPage, PageFetcher};
use crate::error::FetchError;

/// Short-lived memoization of fetched pages, keyed by the requested URL.
///
/// Entries expire after `ttl`, and at most `capacity` pages are kept: the least
/// recently used one is evicted first. Failures are never cached. Each instance
/// owns its entries; nothing is shared globally.
pub struct CachedFetcher<F> {
    inner: F,
    ttl: Duration,
    entries: Mutex<LruCache<String, (Instant, FetchedPage)>>,
}

impl<F: PageFetcher> CachedFetcher<F> {
    /// A zero `capacity` is treated as one.
    pub fn new(inner: F, ttl: Duration, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner,
            ttl,
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    fn lookup(&self, key: &str) -> Option<FetchedPage> {
        let mut entries = self.entries.lock().ok()?;
        let expired = match entries.get(key) {
            Some((stored_at, page)) if stored_at.elapsed() < self.ttl => {
                return Some(page.clone())
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            entries.pop(key);
        }
        None
    }

    fn store(&self, key: String, page: &FetchedPage) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.put(key, (Instant::now(), page.clone()));
        }
    }
}

#[async_trait]
impl<F: PageFetcher> PageFetcher for CachedFetcher<F> {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        let key = url.as_str().to_string();
        if let Some(page) = self.lookup(&key) {
            debug!("Page cache hit for {}", key);
            return Ok(page);
        }

        let page = self.inner.fetch(url).await?;
        self.store(key, &page);
        Ok(page)
    }
}
