use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Meal category assigned to every draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    Breakfast,
    Appetizer,
    #[default]
    Main,
    Side,
    Dessert,
    Snack,
    Drink,
}

impl MealType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Appetizer => "appetizer",
            MealType::Main => "main",
            MealType::Side => "side",
            MealType::Dessert => "dessert",
            MealType::Snack => "snack",
            MealType::Drink => "drink",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the core fields (name, ingredients, steps) of a draft were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    /// Every core field came from embedded metadata
    Structured,
    /// No core field came from embedded metadata
    Heuristic,
    Hybrid,
}

/// Where a single draft field came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    Structured,
    Heuristic,
    /// Nothing was found; the field holds its empty or configured value
    #[default]
    Default,
}

/// Per-field provenance tags, used by reviewers to know what to double check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldProvenance {
    pub name: Provenance,
    pub description: Provenance,
    pub ingredients: Provenance,
    pub steps: Provenance,
    pub servings: Provenance,
    pub prep_minutes: Provenance,
    pub cook_minutes: Provenance,
    pub total_minutes: Provenance,
    pub image_url: Provenance,
    pub meal_type: Provenance,
}

/// The best-effort result of one extraction attempt.
///
/// Drafts are built once at the end of the pipeline and never mutated by this
/// crate afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeDraft {
    pub name: String,
    pub description: Option<String>,
    /// Source order
    pub ingredients: Vec<String>,
    /// Source order
    pub steps: Vec<String>,
    pub servings: Option<u32>,
    pub prep_minutes: Option<u32>,
    pub cook_minutes: Option<u32>,
    /// `prep_minutes + cook_minutes` when both are known
    pub total_minutes: Option<u32>,
    pub image_url: Option<Url>,
    pub meal_type: MealType,
    /// Final page URL after redirects
    pub source_url: Url,
    pub extraction_method: ExtractionMethod,
    pub provenance: FieldProvenance,
}

/// Recipe fields found in embedded linked data, each independently optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructuredRecipeRecord {
    pub name: Option<String>,
    pub description: Option<String>,
    pub ingredients: Option<Vec<String>>,
    pub instructions: Option<Vec<String>>,
    pub prep_time: Option<String>,
    pub cook_time: Option<String>,
    pub image: Option<String>,
    pub recipe_yield: Option<String>,
}
