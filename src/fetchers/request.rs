use async_trait::async_trait;
use log::{debug, warn};
use reqwest::header::CONTENT_TYPE;
use reqwest::{redirect, Client};
use std::time::Duration;
use url::Url;

use super::{ensure_supported_scheme, FetchedPage, PageFetcher};
use crate::config::ExtractorConfig;
use crate::error::FetchError;

/// Fetches pages over HTTP(S) with reqwest.
pub struct RequestFetcher {
    client: Client,
    timeout: Duration,
}

impl RequestFetcher {
    pub fn from_config(config: &ExtractorConfig) -> Result<Self, FetchError> {
        Self::with_settings(config.timeout(), config.max_redirects, &config.user_agent)
    }

    pub fn with_settings(
        timeout: Duration,
        max_redirects: usize,
        user_agent: &str,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(redirect::Policy::limited(max_redirects))
            .user_agent(user_agent)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self { client, timeout })
    }

    async fn fetch_page(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(e, url.as_str()))?;

        let final_url = response.url().clone();
        ensure_supported_scheme(&final_url)?;
        if final_url != *url {
            debug!("{} redirected to {}", url, final_url);
        }

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                url: final_url.to_string(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        if let Some(content_type) = &content_type {
            if !is_page_content_type(content_type) {
                return Err(FetchError::Decode(format!(
                    "unsupported content type '{content_type}'"
                )));
            }
        }

        let content = response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(e, final_url.as_str()))?;

        Ok(FetchedPage {
            final_url,
            content,
            content_type,
        })
    }
}

#[async_trait]
impl PageFetcher for RequestFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        ensure_supported_scheme(url)?;

        // The client timeout covers each request; this one bounds the whole
        // exchange including a slowly trickling body.
        let result = match tokio::time::timeout(self.timeout, self.fetch_page(url)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(url.to_string())),
        };
        if let Err(e) = &result {
            warn!("Fetching {} failed: {}", url, e);
        }
        result
    }
}

/// Absent, `text/*`, `application/xhtml+xml` or `application/xml`.
fn is_page_content_type(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime.is_empty()
        || mime.starts_with("text/")
        || matches!(mime.as_str(), "application/xhtml+xml" | "application/xml")
}
