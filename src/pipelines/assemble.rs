use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;
use url::Url;

use crate::config::ExtractorConfig;
use crate::duration::DurationParser;
use crate::extractors::{absolutize, HtmlHeuristicExtractor, ImageResolver, JsonLdExtractor};
use crate::keywords::{LocaleKeywords, FRENCH};
use crate::meal_type::MealTypeClassifier;
use crate::model::{ExtractionMethod, FieldProvenance, Provenance, RecipeDraft};

static FIRST_INTEGER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("valid regex"));

/// Merges structured and heuristic results into a [`RecipeDraft`].
///
/// Structured values always win; heuristics are only consulted for fields
/// the structured pass left empty.
pub struct ResultAssembler {
    keywords: &'static LocaleKeywords,
    durations: DurationParser,
    classifier: MealTypeClassifier,
    images: ImageResolver,
}

impl ResultAssembler {
    pub fn new(config: &ExtractorConfig) -> Self {
        Self::with_keywords(config, &FRENCH)
    }

    pub fn with_keywords(config: &ExtractorConfig, keywords: &'static LocaleKeywords) -> Self {
        Self {
            keywords,
            durations: DurationParser::new(keywords),
            classifier: MealTypeClassifier::with_keywords(keywords, config.default_meal_type),
            images: ImageResolver::new(config.min_image_size),
        }
    }

    pub fn assemble(&self, html: &str, final_url: &Url) -> RecipeDraft {
        let document = Html::parse_document(html);
        let structured = JsonLdExtractor.extract(&document).unwrap_or_default();
        let heuristic = HtmlHeuristicExtractor::with_keywords(&document, self.keywords);
        let mut provenance = FieldProvenance::default();

        let (name, source) = prefer_structured(structured.name, || heuristic.name());
        provenance.name = source;
        let name = name.unwrap_or_default();

        let (description, source) =
            prefer_structured(structured.description, || heuristic.description());
        provenance.description = source;

        let (ingredients, source) =
            prefer_structured(structured.ingredients, || heuristic.ingredients());
        provenance.ingredients = source;
        let ingredients = ingredients.unwrap_or_default();

        let (steps, source) = prefer_structured(structured.instructions, || heuristic.steps());
        provenance.steps = source;
        let steps = steps.unwrap_or_default();

        // Durations and yield only come from structured data
        let servings = structured.recipe_yield.as_deref().and_then(first_integer);
        provenance.servings = structured_if_some(&servings);
        let prep_minutes = self.durations.parse(structured.prep_time.as_deref());
        provenance.prep_minutes = structured_if_some(&prep_minutes);
        let cook_minutes = self.durations.parse(structured.cook_time.as_deref());
        provenance.cook_minutes = structured_if_some(&cook_minutes);
        let total_minutes = match (prep_minutes, cook_minutes) {
            (Some(prep), Some(cook)) => prep.checked_add(cook),
            _ => None,
        };
        provenance.total_minutes = structured_if_some(&total_minutes);

        let structured_image = structured
            .image
            .as_deref()
            .and_then(|raw| absolutize(raw, final_url));
        let (image_url, source) =
            prefer_structured(structured_image, || self.images.resolve(&document, final_url));
        provenance.image_url = source;

        let classified_text = format!("{} {}", name, description.as_deref().unwrap_or(""));
        let meal_type = match self.classifier.detect(&classified_text) {
            Some(meal_type) => {
                provenance.meal_type = Provenance::Heuristic;
                meal_type
            }
            None => {
                provenance.meal_type = Provenance::Default;
                self.classifier.default_meal_type()
            }
        };

        let extraction_method = extraction_method(&provenance);
        info!(
            "Extracted '{}' from {} ({:?}, {} ingredients, {} steps)",
            name,
            final_url,
            extraction_method,
            ingredients.len(),
            steps.len()
        );

        RecipeDraft {
            name,
            description,
            ingredients,
            steps,
            servings,
            prep_minutes,
            cook_minutes,
            total_minutes,
            image_url,
            meal_type,
            source_url: final_url.clone(),
            extraction_method,
            provenance,
        }
    }
}

impl Default for ResultAssembler {
    fn default() -> Self {
        Self::new(&ExtractorConfig::default())
    }
}

/// The structured value if present, else the heuristic one, with its source.
fn prefer_structured<T>(
    structured: Option<T>,
    heuristic: impl FnOnce() -> Option<T>,
) -> (Option<T>, Provenance) {
    if structured.is_some() {
        return (structured, Provenance::Structured);
    }
    match heuristic() {
        Some(value) => (Some(value), Provenance::Heuristic),
        None => (None, Provenance::Default),
    }
}

fn structured_if_some<T>(value: &Option<T>) -> Provenance {
    if value.is_some() {
        Provenance::Structured
    } else {
        Provenance::Default
    }
}

fn first_integer(text: &str) -> Option<u32> {
    FIRST_INTEGER
        .find(text)
        .and_then(|m| m.as_str().parse().ok())
        .filter(|servings| *servings > 0)
}

fn extraction_method(provenance: &FieldProvenance) -> ExtractionMethod {
    let core = [provenance.name, provenance.ingredients, provenance.steps];
    let structured = core
        .iter()
        .filter(|source| **source == Provenance::Structured)
        .count();
    debug!("{} of {} core fields from structured data", structured, core.len());

    if structured == core.len() {
        ExtractionMethod::Structured
    } else if structured == 0 {
        ExtractionMethod::Heuristic
    } else {
        ExtractionMethod::Hybrid
    }
}
