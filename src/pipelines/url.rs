use log::info;

use super::ResultAssembler;
use crate::error::FetchError;
use crate::fetchers::{parse_target_url, PageFetcher};
use crate::model::RecipeDraft;

/// Process a URL into a recipe draft
///
/// This pipeline:
/// 1. Validates the URL (http or https only)
/// 2. Fetches the page, following a bounded number of redirects
/// 3. Reads embedded JSON-LD, then fills remaining gaps from the markup
/// 4. Parses durations, resolves the image and classifies the meal type
///
/// # Arguments
/// * `url` - The URL to fetch and process
/// * `fetcher` - Transport used for the single page retrieval
/// * `assembler` - Turns the fetched page into a draft
///
/// # Returns
/// * `Ok(RecipeDraft)` - A best-effort draft; missing fields are left empty
/// * `Err(FetchError)` - The page could not be retrieved; no draft is produced
pub async fn process(
    url: &str,
    fetcher: &dyn PageFetcher,
    assembler: &ResultAssembler,
) -> Result<RecipeDraft, FetchError> {
    let target = parse_target_url(url)?;
    info!("Extracting recipe from {}", target);

    let page = fetcher.fetch(&target).await?;

    Ok(assembler.assemble(&page.content, &page.final_url))
}
