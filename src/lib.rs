pub mod builder;
pub mod config;
pub mod duration;
pub mod error;
pub mod extractors;
pub mod fetchers;
pub mod keywords;
pub mod meal_type;
pub mod model;
pub mod pipelines;
mod text;

// Re-export main types
pub use builder::{RecipeExtractor, RecipeExtractorBuilder};
pub use config::ExtractorConfig;
pub use duration::parse_minutes;
pub use error::FetchError;
pub use fetchers::{FetchedPage, PageFetcher};
pub use meal_type::MealTypeClassifier;
pub use model::{
    ExtractionMethod, FieldProvenance, MealType, Provenance, RecipeDraft, StructuredRecipeRecord,
};

use url::Url;

/// Fetch a recipe page and extract a draft with default settings
///
/// # Arguments
/// * `url` - The recipe page URL (http or https)
///
/// # Returns
/// A best-effort [`RecipeDraft`], or a [`FetchError`] when the page could not
/// be retrieved
///
/// # Example
/// ```no_run
/// use recipe_extract::extract_recipe;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let draft = extract_recipe("https://example.com/recipe").await?;
/// println!("{}: {:?} minutes", draft.name, draft.total_minutes);
/// # Ok(())
/// # }
/// ```
pub async fn extract_recipe(url: &str) -> Result<RecipeDraft, FetchError> {
    RecipeExtractor::builder().build()?.extract(url).await
}

/// Fetch a recipe page and extract a draft using the given configuration
pub async fn extract_recipe_with_config(
    url: &str,
    config: &ExtractorConfig,
) -> Result<RecipeDraft, FetchError> {
    RecipeExtractor::builder()
        .config(config)
        .build()?
        .extract(url)
        .await
}

/// Extract a draft from HTML that was already retrieved
///
/// `final_url` is the page's address after redirects; relative image
/// references are resolved against it.
pub fn extract_from_html(html: &str, final_url: &Url) -> RecipeDraft {
    pipelines::ResultAssembler::default().assemble(html, final_url)
}
