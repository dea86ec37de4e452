//! Locale keyword tables.
//!
//! Extraction code never embeds literal words; it reads them from a
//! [`LocaleKeywords`] table so a new locale or site convention is a data change.
//! Heading and meal keywords are written lowercase without accents, and are
//! compared against text folded the same way (see [`fold`]).

use crate::model::MealType;

/// Keyword tables for one locale.
#[derive(Debug, Clone, Copy)]
pub struct LocaleKeywords {
    /// Heading words announcing an ingredient list
    pub ingredient_headings: &'static [&'static str],
    /// Heading words announcing the preparation steps
    pub step_headings: &'static [&'static str],
    /// Class/id fragments of ingredient list containers
    pub ingredient_class_patterns: &'static [&'static str],
    /// Class/id fragments of step list containers
    pub step_class_patterns: &'static [&'static str],
    /// Prefixes of numbered steps ("Étape 2 :")
    pub step_prefixes: &'static [&'static str],
    /// List entries that are navigation rather than content
    pub stop_words: &'static [&'static str],
    /// Full hour words for the natural-language duration grammar
    pub hour_words: &'static [&'static str],
    /// Full minute words for the natural-language duration grammar
    pub minute_words: &'static [&'static str],
    /// Hour abbreviation used in "1h 30"
    pub hour_short: &'static [&'static str],
    /// Minute abbreviation used in "45min"
    pub minute_short: &'static [&'static str],
    /// Ordered meal category table, earliest match wins
    pub meal_types: &'static [(MealType, &'static [&'static str])],
}

pub static FRENCH: LocaleKeywords = LocaleKeywords {
    ingredient_headings: &["ingredient", "ingredients"],
    step_headings: &[
        "preparation",
        "etape",
        "etapes",
        "instruction",
        "instructions",
        "deroulement",
        "realisation",
        "methode",
        "directions",
        "method",
        "steps",
    ],
    ingredient_class_patterns: &["ingredient", "ingred"],
    step_class_patterns: &[
        "instruction",
        "preparation",
        "direction",
        "step",
        "etape",
        "method",
    ],
    step_prefixes: &["etape", "step"],
    stop_words: &[
        "accueil",
        "home",
        "menu",
        "imprimer",
        "print",
        "partager",
        "share",
        "voir plus",
        "lire la suite",
        "suivant",
        "precedent",
        "newsletter",
        "connexion",
        "pinterest",
        "facebook",
        "twitter",
    ],
    hour_words: &["heure", "heures", "hour", "hours"],
    minute_words: &["minute", "minutes"],
    hour_short: &["h"],
    minute_short: &["min"],
    meal_types: &[
        (
            MealType::Breakfast,
            &[
                "petit dejeuner",
                "petit-dejeuner",
                "brunch",
                "breakfast",
                "porridge",
                "granola",
                "pancake",
                "pancakes",
                "crepe",
                "crepes",
                "omelette",
                "muesli",
                "smoothie bowl",
            ],
        ),
        (
            MealType::Appetizer,
            &[
                "aperitif",
                "apero",
                "entree",
                "amuse-bouche",
                "amuse-bouches",
                "toast",
                "toasts",
                "verrine",
                "verrines",
                "tapas",
                "bricks",
                "samoussa",
                "samoussas",
                "appetizer",
                "starter",
            ],
        ),
        (
            MealType::Dessert,
            &[
                "dessert",
                "gateau",
                "tarte sucree",
                "mousse au chocolat",
                "chocolat",
                "cookie",
                "cookies",
                "brownie",
                "fondant",
                "clafoutis",
                "tiramisu",
                "creme brulee",
                "glace",
                "sorbet",
                "cake",
                "muffin",
                "muffins",
                "biscuit",
                "biscuits",
                "compote",
                "madeleine",
                "madeleines",
            ],
        ),
        (
            MealType::Drink,
            &[
                "boisson",
                "cocktail",
                "smoothie",
                "jus",
                "limonade",
                "sirop",
                "milkshake",
                "drink",
            ],
        ),
        (
            MealType::Side,
            &[
                "accompagnement",
                "puree",
                "salade verte",
                "legumes rotis",
                "frites",
                "side dish",
            ],
        ),
        (
            MealType::Snack,
            &["gouter", "encas", "en-cas", "barre de cereales", "snack"],
        ),
        (
            MealType::Main,
            &[
                "plat",
                "plat principal",
                "diner",
                "dejeuner",
                "gratin",
                "lasagnes",
                "poulet",
                "boeuf",
                "poisson",
                "curry",
                "risotto",
                "soupe",
                "veloute",
                "quiche",
                "pates",
                "dinner",
                "main course",
            ],
        ),
    ],
};

/// Lowercase and strip the French diacritics the keyword tables are written without.
pub fn fold(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'à' | 'á' | 'â' | 'ä' | 'ã' => 'a',
            'ç' => 'c',
            'è' | 'é' | 'ê' | 'ë' => 'e',
            'ì' | 'í' | 'î' | 'ï' => 'i',
            'ò' | 'ó' | 'ô' | 'ö' | 'õ' => 'o',
            'ù' | 'ú' | 'û' | 'ü' => 'u',
            'ÿ' => 'y',
            '\u{2019}' => '\'',
            other => other,
        })
        .collect::<String>()
        .replace('œ', "oe")
        .replace('æ', "ae")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_strips_accents_and_case() {
        assert_eq!(fold("Préparation"), "preparation");
        assert_eq!(fold("ÉTAPES"), "etapes");
        assert_eq!(fold("Bœuf bourguignon"), "boeuf bourguignon");
        assert_eq!(fold("Petit-Déjeuner"), "petit-dejeuner");
    }

    #[test]
    fn test_tables_are_folded() {
        let tables = [
            FRENCH.ingredient_headings,
            FRENCH.step_headings,
            FRENCH.stop_words,
            FRENCH.step_prefixes,
        ];
        for table in tables {
            for word in table {
                assert_eq!(fold(word), *word);
            }
        }
        for (_, words) in FRENCH.meal_types {
            for word in *words {
                assert_eq!(fold(word), *word);
            }
        }
    }

    #[test]
    fn test_meal_table_entries_have_keywords() {
        assert!(FRENCH.meal_types.iter().all(|(_, words)| !words.is_empty()));
        assert_eq!(FRENCH.meal_types[0].0, MealType::Breakfast);
    }
}
