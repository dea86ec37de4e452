use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::config::ExtractorConfig;
use crate::error::FetchError;
use crate::fetchers::{CachedFetcher, PageFetcher, RequestFetcher};
use crate::model::{MealType, RecipeDraft};
use crate::pipelines::{self, ResultAssembler};

/// A configured extraction pipeline.
///
/// Holds no per-extraction state, so one instance can serve any number of
/// concurrent [`extract`](RecipeExtractor::extract) calls.
pub struct RecipeExtractor {
    fetcher: Arc<dyn PageFetcher>,
    assembler: ResultAssembler,
}

impl RecipeExtractor {
    /// Create a new builder for configuring extraction
    ///
    /// # Example
    /// ```no_run
    /// use recipe_extract::RecipeExtractor;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let extractor = RecipeExtractor::builder().build()?;
    /// let draft = extractor.extract("https://example.com/recipe").await?;
    /// println!("{} ({} ingredients)", draft.name, draft.ingredients.len());
    /// # Ok(())
    /// # }
    /// ```
    pub fn builder() -> RecipeExtractorBuilder {
        RecipeExtractorBuilder::default()
    }

    /// Fetch `url` and extract a draft from it.
    pub async fn extract(&self, url: &str) -> Result<RecipeDraft, FetchError> {
        pipelines::url::process(url, self.fetcher.as_ref(), &self.assembler).await
    }

    /// Extract a draft from already retrieved HTML.
    pub fn extract_html(&self, html: &str, final_url: &Url) -> RecipeDraft {
        self.assembler.assemble(html, final_url)
    }
}

/// Builder for configuring a [`RecipeExtractor`]
#[derive(Default)]
pub struct RecipeExtractorBuilder {
    config: ExtractorConfig,
    timeout: Option<Duration>,
    cache_ttl: Option<Duration>,
    fetcher: Option<Arc<dyn PageFetcher>>,
}

impl RecipeExtractorBuilder {
    /// Start from a loaded configuration; later calls override its values
    pub fn config(mut self, config: &ExtractorConfig) -> Self {
        self.config = config.clone();
        self
    }

    /// Set the overall fetch timeout
    ///
    /// Default is 20 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set how many redirects are followed before failing
    pub fn max_redirects(mut self, max_redirects: usize) -> Self {
        self.config.max_redirects = max_redirects;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Category assigned when no meal keyword matches
    pub fn default_meal_type(mut self, meal_type: MealType) -> Self {
        self.config.default_meal_type = meal_type;
        self
    }

    /// Images declaring a smaller width or height are treated as icons
    pub fn min_image_size(mut self, pixels: u32) -> Self {
        self.config.min_image_size = pixels;
        self
    }

    /// Memoize fetched pages for `ttl`
    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = Some(ttl);
        self
    }

    /// Keep at most `pages` entries in the page cache
    ///
    /// Only used together with a cache TTL. Default is 256.
    pub fn cache_capacity(mut self, pages: usize) -> Self {
        self.config.cache_capacity = pages;
        self
    }

    /// Use a custom transport instead of the default HTTP client
    ///
    /// Timeout, redirect and user agent settings then belong to that fetcher.
    pub fn fetcher(mut self, fetcher: impl PageFetcher + 'static) -> Self {
        self.fetcher = Some(Arc::new(fetcher));
        self
    }

    pub fn build(self) -> Result<RecipeExtractor, FetchError> {
        let fetcher: Arc<dyn PageFetcher> = match (self.fetcher, self.timeout) {
            (Some(fetcher), _) => fetcher,
            (None, Some(timeout)) => Arc::new(RequestFetcher::with_settings(
                timeout,
                self.config.max_redirects,
                &self.config.user_agent,
            )?),
            (None, None) => Arc::new(RequestFetcher::from_config(&self.config)?),
        };

        let fetcher: Arc<dyn PageFetcher> = match self.cache_ttl.or(self.config.cache_ttl()) {
            Some(ttl) => Arc::new(CachedFetcher::new(
                fetcher,
                ttl,
                self.config.cache_capacity,
            )),
            None => fetcher,
        };

        Ok(RecipeExtractor {
            fetcher,
            assembler: ResultAssembler::new(&self.config),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetchers::FetchedPage;
    use crate::model::Provenance;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedPage {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl PageFetcher for FixedPage {
        async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(FetchedPage {
                final_url: url.clone(),
                content: "<h1>Recette mystère</h1>".to_string(),
                content_type: None,
            })
        }
    }

    #[test]
    fn test_builder_defaults() {
        assert!(RecipeExtractor::builder().build().is_ok());
    }

    #[tokio::test]
    async fn test_builder_custom_fetcher_and_default_meal_type() {
        let calls = Arc::new(AtomicUsize::new(0));
        let extractor = RecipeExtractor::builder()
            .fetcher(FixedPage {
                calls: calls.clone(),
            })
            .default_meal_type(MealType::Dessert)
            .build()
            .unwrap();

        let draft = extractor.extract("https://site.example/x").await.unwrap();

        assert_eq!(draft.name, "Recette mystère");
        assert_eq!(draft.meal_type, MealType::Dessert);
        assert_eq!(draft.provenance.meal_type, Provenance::Default);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_builder_cache_wraps_custom_fetcher() {
        let calls = Arc::new(AtomicUsize::new(0));
        let extractor = RecipeExtractor::builder()
            .fetcher(FixedPage {
                calls: calls.clone(),
            })
            .cache_ttl(Duration::from_secs(30))
            .build()
            .unwrap();

        extractor.extract("https://site.example/x").await.unwrap();
        extractor.extract("https://site.example/x").await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_extract_html_without_network() {
        let extractor = RecipeExtractor::builder().build().unwrap();
        let url = Url::parse("https://site.example/recipes/x").unwrap();
        let draft = extractor.extract_html("<h1>Soupe maison</h1>", &url);

        assert_eq!(draft.name, "Soupe maison");
        assert_eq!(draft.meal_type, MealType::Main);
    }
}
