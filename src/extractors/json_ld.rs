use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::model::StructuredRecipeRecord;
use crate::text::{clean_text, non_empty};

static LD_JSON_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("script[type*='ld+json']").expect("valid selector"));
static TRAILING_COMMA: Lazy<Regex> = Lazy::new(|| Regex::new(r",\s*([\]}])").expect("valid regex"));

/// Nesting bound when flattening arrays and graphs
const MAX_DEPTH: usize = 8;

/// Reads schema.org Recipe data from `application/ld+json` blocks.
pub struct JsonLdExtractor;

impl JsonLdExtractor {
    /// The first Recipe found in the page's linked-data blocks.
    ///
    /// Blocks that fail to parse are skipped. `None` means no block carried a
    /// Recipe.
    pub fn extract(&self, document: &Html) -> Option<StructuredRecipeRecord> {
        for (index, script) in document.select(&LD_JSON_SELECTOR).enumerate() {
            let raw = script.text().collect::<String>();
            let Some(value) = parse_block(&raw) else {
                debug!("Skipping unparseable JSON-LD block #{}", index);
                continue;
            };

            let Some(block) = LinkedData::from_value(value) else {
                debug!("Skipping JSON-LD block #{} with scalar content", index);
                continue;
            };

            let mut candidates = Vec::new();
            block.collect_candidates(0, &mut candidates);

            if let Some(recipe) = candidates.into_iter().find(is_recipe) {
                debug!("Found Recipe in JSON-LD block #{}", index);
                return Some(to_record(recipe));
            }
        }

        debug!("No JSON-LD Recipe found");
        None
    }
}

/// Top-level shapes a linked-data block takes in the wild.
enum LinkedData {
    Object(Map<String, Value>),
    Array(Vec<Value>),
    Graph(Vec<Value>),
}

impl LinkedData {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Array(items) => Some(LinkedData::Array(items)),
            Value::Object(mut map) => match map.remove("@graph") {
                Some(Value::Array(mut items)) => {
                    // A typed container is a candidate itself
                    if map.contains_key("@type") {
                        items.insert(0, Value::Object(map));
                    }
                    Some(LinkedData::Graph(items))
                }
                Some(single @ Value::Object(_)) => Some(LinkedData::Graph(vec![single])),
                _ => Some(LinkedData::Object(map)),
            },
            _ => None,
        }
    }

    /// Flatten into plain objects, preserving document order.
    fn collect_candidates(self, depth: usize, out: &mut Vec<Map<String, Value>>) {
        match self {
            LinkedData::Object(map) => out.push(map),
            LinkedData::Array(items) | LinkedData::Graph(items) => {
                if depth >= MAX_DEPTH {
                    return;
                }
                for item in items {
                    if let Some(inner) = LinkedData::from_value(item) {
                        inner.collect_candidates(depth + 1, out);
                    }
                }
            }
        }
    }
}

fn parse_block(raw: &str) -> Option<Value> {
    serde_json::from_str(raw.trim())
        .or_else(|_| serde_json::from_str(&sanitize_json(raw)))
        .ok()
}

/// Repair the usual hand-written JSON-LD mistakes.
fn sanitize_json(json_str: &str) -> String {
    let mut cleaned = json_str
        .replace("<!--", "")
        .replace("-->", "")
        .replace("<![CDATA[", "")
        .replace("]]>", "");

    cleaned = cleaned.trim().trim_end_matches(';').to_string();

    // Leading junk before the first object
    if !cleaned.starts_with('{') && !cleaned.starts_with('[') {
        if let Some(start) = cleaned.find(['{', '[']) {
            cleaned = cleaned[start..].to_string();
        }
    }

    TRAILING_COMMA.replace_all(&cleaned, "$1").into_owned()
}

fn is_recipe(candidate: &Map<String, Value>) -> bool {
    match candidate.get("@type") {
        Some(Value::String(kind)) => names_recipe(kind),
        Some(Value::Array(kinds)) => kinds.iter().filter_map(Value::as_str).any(names_recipe),
        _ => false,
    }
}

/// Accepts "Recipe", "recipe", "schema:Recipe" and "http://schema.org/Recipe".
fn names_recipe(kind: &str) -> bool {
    kind.rsplit(['/', ':', '#'])
        .next()
        .is_some_and(|local| local.trim().eq_ignore_ascii_case("recipe"))
}

/// Deserialize a field, turning any shape mismatch into `None`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct JsonLdRecipe {
    #[serde(deserialize_with = "lenient")]
    name: Option<String>,
    #[serde(deserialize_with = "lenient")]
    description: Option<DescriptionType>,
    #[serde(deserialize_with = "lenient")]
    image: Option<ImageType>,
    #[serde(rename = "recipeIngredient", deserialize_with = "lenient")]
    recipe_ingredient: Option<OneOrMany<IngredientEntry>>,
    #[serde(rename = "recipeInstructions", deserialize_with = "lenient")]
    recipe_instructions: Option<Instructions>,
    #[serde(rename = "prepTime", deserialize_with = "lenient")]
    prep_time: Option<String>,
    #[serde(rename = "cookTime", deserialize_with = "lenient")]
    cook_time: Option<String>,
    #[serde(rename = "recipeYield", deserialize_with = "lenient")]
    recipe_yield: Option<OneOrMany<YieldValue>>,
}

// Sequence variants come first in the untagged enums below: serde would
// otherwise happily read a short array positionally into a struct variant.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(item) => vec![item],
            OneOrMany::Many(items) => items,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TextObject {
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DescriptionType {
    String(String),
    Object(TextObject),
}

#[derive(Debug, Deserialize)]
struct ImageObject {
    url: Option<String>,
    #[serde(rename = "contentUrl")]
    content_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ImageType {
    Multiple(Vec<ImageType>),
    String(String),
    Object(ImageObject),
    Other(IgnoredAny),
}

impl ImageType {
    fn first_url(self) -> Option<String> {
        match self {
            ImageType::String(url) => non_empty(clean_text(&url)),
            ImageType::Object(obj) => obj
                .url
                .or(obj.content_url)
                .and_then(|url| non_empty(clean_text(&url))),
            ImageType::Multiple(images) => images.into_iter().find_map(ImageType::first_url),
            ImageType::Other(_) => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct IngredientObject {
    name: String,
    amount: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum IngredientEntry {
    Text(String),
    Object(IngredientObject),
    Other(IgnoredAny),
}

impl IngredientEntry {
    fn into_text(self) -> Option<String> {
        let text = match self {
            IngredientEntry::Text(text) => clean_text(&text),
            IngredientEntry::Object(obj) => {
                let amount = obj.amount.as_deref().unwrap_or("").trim();
                clean_text(&format!("{amount} {}", obj.name))
            }
            IngredientEntry::Other(_) => return None,
        };
        non_empty(text)
    }
}

/// `HowToStep`, `HowToSection`, or a plain object carrying `text`.
#[derive(Debug, Deserialize)]
struct InstructionObject {
    text: Option<String>,
    name: Option<String>,
    #[serde(rename = "itemListElement")]
    item_list_element: Option<Box<Instructions>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Instructions {
    List(Vec<Instructions>),
    Text(String),
    Object(InstructionObject),
    Other(IgnoredAny),
}

impl Instructions {
    fn flatten_into(self, steps: &mut Vec<String>) {
        match self {
            Instructions::Text(text) => steps.extend(non_empty(clean_text(&text))),
            Instructions::Object(obj) => {
                if let Some(section) = obj.item_list_element {
                    // Section titles are headings, not steps
                    section.flatten_into(steps);
                } else if let Some(text) = obj.text.or(obj.name) {
                    steps.extend(non_empty(clean_text(&text)));
                }
            }
            Instructions::List(items) => {
                for item in items {
                    item.flatten_into(steps);
                }
            }
            Instructions::Other(_) => {}
        }
    }

    fn into_steps(self) -> Vec<String> {
        let mut steps = Vec::new();
        match self {
            // A single text blob usually holds one step per line
            Instructions::Text(text) => {
                for line in text.lines() {
                    steps.extend(non_empty(clean_text(line)));
                }
            }
            other => other.flatten_into(&mut steps),
        }
        steps
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum YieldValue {
    Text(String),
    Number(serde_json::Number),
}

impl YieldValue {
    fn into_text(self) -> String {
        match self {
            YieldValue::Text(text) => clean_text(&text),
            YieldValue::Number(number) => number.to_string(),
        }
    }
}

fn to_record(candidate: Map<String, Value>) -> StructuredRecipeRecord {
    let recipe: JsonLdRecipe =
        serde_json::from_value(Value::Object(candidate)).unwrap_or_default();

    let ingredients = recipe.recipe_ingredient.map(|entries| {
        entries
            .into_vec()
            .into_iter()
            .filter_map(IngredientEntry::into_text)
            .collect::<Vec<_>>()
    });
    let instructions = recipe.recipe_instructions.map(Instructions::into_steps);

    let recipe_yield = recipe.recipe_yield.and_then(|value| {
        let values: Vec<String> = value
            .into_vec()
            .into_iter()
            .map(YieldValue::into_text)
            .filter(|v| !v.is_empty())
            .collect();
        // Prefer the descriptive variant ("4 personnes") over a bare number
        values
            .iter()
            .find(|v| v.contains(char::is_alphabetic))
            .or_else(|| values.first())
            .cloned()
    });

    StructuredRecipeRecord {
        name: recipe.name.and_then(|n| non_empty(clean_text(&n))),
        description: recipe.description.and_then(|desc| match desc {
            DescriptionType::String(d) => non_empty(clean_text(&d)),
            DescriptionType::Object(d) => non_empty(clean_text(&d.text)),
        }),
        ingredients: ingredients.filter(|list| !list.is_empty()),
        instructions: instructions.filter(|list| !list.is_empty()),
        prep_time: recipe.prep_time.and_then(|t| non_empty(t.trim().to_string())),
        cook_time: recipe.cook_time.and_then(|t| non_empty(t.trim().to_string())),
        image: recipe.image.and_then(ImageType::first_url),
        recipe_yield,
    }
}
