use log::debug;
use regex::Regex;

use crate::keywords::{fold, LocaleKeywords, FRENCH};
use crate::model::MealType;

/// Maps free text (recipe name and description) to a meal category.
///
/// Categories are tried in table order and the first one with a keyword
/// matching on word boundaries wins. When nothing matches the configured
/// default is returned, so classification always yields a value.
pub struct MealTypeClassifier {
    table: Vec<(MealType, Regex)>,
    default: MealType,
}

impl MealTypeClassifier {
    pub fn new(default: MealType) -> Self {
        Self::with_keywords(&FRENCH, default)
    }

    pub fn with_keywords(keywords: &LocaleKeywords, default: MealType) -> Self {
        let table = keywords
            .meal_types
            .iter()
            .filter(|(_, words)| !words.is_empty())
            .filter_map(|(meal_type, words)| {
                let alternation = words
                    .iter()
                    .map(|w| regex::escape(w))
                    .collect::<Vec<_>>()
                    .join("|");
                Regex::new(&format!(r"\b(?:{alternation})\b"))
                    .ok()
                    .map(|re| (*meal_type, re))
            })
            .collect();

        Self { table, default }
    }

    pub fn default_meal_type(&self) -> MealType {
        self.default
    }

    /// The first category with a keyword match, if any.
    pub fn detect(&self, text: &str) -> Option<MealType> {
        let folded = fold(text);
        let found = self
            .table
            .iter()
            .find(|(_, pattern)| pattern.is_match(&folded))
            .map(|(meal_type, _)| *meal_type);
        debug!("Meal type for {:?}: {:?}", text, found);
        found
    }

    pub fn classify(&self, text: &str) -> MealType {
        self.detect(text).unwrap_or(self.default)
    }
}

impl Default for MealTypeClassifier {
    fn default() -> Self {
        Self::new(MealType::default())
    }
}
