use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::keywords::{fold, LocaleKeywords, FRENCH};
use crate::text::{clean_text, element_text, non_empty};

static H1: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").expect("valid selector"));
static OG_TITLE: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("meta[property='og:title'], meta[name='og:title']").expect("valid selector")
});
static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("title").expect("valid selector"));
static META_DESCRIPTION: Lazy<Selector> =
    Lazy::new(|| Selector::parse("meta[name='description']").expect("valid selector"));
static OG_DESCRIPTION: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("meta[property='og:description'], meta[name='og:description']")
        .expect("valid selector")
});
/// Headings, lists and the block elements that end a heading's list run
static BLOCKS: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(
        "h1, h2, h3, h4, h5, h6, ul, ol, p, div, section, article, table, form, blockquote, \
         figure, header, footer, nav, aside",
    )
    .expect("valid selector")
});
static LISTS: Lazy<Selector> = Lazy::new(|| Selector::parse("ul, ol").expect("valid selector"));

/// Containers whose lists are site navigation, never recipe content
const PAGE_CHROME: [&str; 4] = ["nav", "footer", "aside", "header"];

/// Ancestors inspected for a class/id pattern
const CLASS_SEARCH_DEPTH: usize = 3;
/// Longer list entries are page content, not ingredients or steps
const MAX_ITEM_LEN: usize = 1000;

/// Pattern-based extraction from human-oriented markup.
///
/// Every accessor is independent and only runs when asked, so the caller can
/// request exactly the fields structured data left empty. Any of them may
/// return `None`.
pub struct HtmlHeuristicExtractor<'a> {
    document: &'a Html,
    keywords: &'a LocaleKeywords,
    step_number: Regex,
}

impl<'a> HtmlHeuristicExtractor<'a> {
    pub fn new(document: &'a Html) -> Self {
        Self::with_keywords(document, &FRENCH)
    }

    pub fn with_keywords(document: &'a Html, keywords: &'a LocaleKeywords) -> Self {
        let prefixes = keywords
            .step_prefixes
            .iter()
            .map(|p| regex::escape(p))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = if prefixes.is_empty() {
            r"^\s*\d+\s*[.):\-–]\s*".to_string()
        } else {
            format!(r"^\s*(?:(?:{prefixes})\s*\d+\s*[.):\-–]?|\d+\s*[.):\-–])\s*")
        };
        let step_number = Regex::new(&pattern).expect("step number pattern is valid");

        Self {
            document,
            keywords,
            step_number,
        }
    }

    /// First `h1`, else the page title metadata.
    pub fn name(&self) -> Option<String> {
        let from_heading = self
            .document
            .select(&H1)
            .find_map(|h1| non_empty(element_text(&h1)));
        if from_heading.is_some() {
            return from_heading;
        }

        self.document
            .select(&OG_TITLE)
            .filter_map(|meta| meta.value().attr("content"))
            .find_map(|content| non_empty(clean_text(content)))
            .or_else(|| {
                self.document
                    .select(&TITLE)
                    .find_map(|title| non_empty(element_text(&title)))
            })
    }

    /// `meta[name=description]`, else `og:description`.
    pub fn description(&self) -> Option<String> {
        self.meta_content(&META_DESCRIPTION)
            .or_else(|| self.meta_content(&OG_DESCRIPTION))
    }

    fn meta_content(&self, selector: &Selector) -> Option<String> {
        self.document
            .select(selector)
            .filter_map(|meta| meta.value().attr("content"))
            .find_map(|content| non_empty(clean_text(content)))
    }

    pub fn ingredients(&self) -> Option<Vec<String>> {
        let lists = self.find_lists(
            self.keywords.ingredient_headings,
            self.keywords.ingredient_class_patterns,
        );
        let items = self.collect_items(&lists, |text| Some(text.to_string()));
        debug!("Heuristic ingredients: {} found", items.len());
        Some(items).filter(|items| !items.is_empty())
    }

    pub fn steps(&self) -> Option<Vec<String>> {
        let lists = self.find_lists(
            self.keywords.step_headings,
            self.keywords.step_class_patterns,
        );
        let items = self.collect_items(&lists, |text| self.strip_step_number(text));
        debug!("Heuristic steps: {} found", items.len());
        Some(items).filter(|items| !items.is_empty())
    }

    /// Lists under a matching heading, else lists carrying a matching class or id.
    ///
    /// A heading covers the lists that directly follow it; the first other
    /// block element after those lists ends its scope. Lists inside page
    /// chrome (nav, footer, aside, header) are never considered.
    fn find_lists(&self, heading_words: &[&str], class_patterns: &[&str]) -> Vec<ElementRef<'a>> {
        let mut under_heading = Vec::new();
        let mut scope = HeadingScope::Outside;

        for element in self.document.select(&BLOCKS) {
            if is_inside_list(&element) {
                continue;
            }
            match element.value().name() {
                "ul" | "ol" => {
                    if scope != HeadingScope::Outside && !is_page_chrome(&element) {
                        under_heading.push(element);
                        scope = HeadingScope::Collecting;
                    }
                }
                "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                    let heading = fold(&element_text(&element));
                    scope = if heading_words.iter().any(|word| heading.contains(word)) {
                        HeadingScope::Open
                    } else {
                        HeadingScope::Outside
                    };
                }
                _ => {
                    if scope == HeadingScope::Collecting {
                        scope = HeadingScope::Outside;
                    }
                }
            }
        }
        if !under_heading.is_empty() {
            return under_heading;
        }

        self.document
            .select(&LISTS)
            .filter(|list| !is_inside_list(list) && !is_page_chrome(list))
            .filter(|list| carries_pattern(list, class_patterns))
            .collect()
    }

    fn collect_items<F>(&self, lists: &[ElementRef<'a>], mut transform: F) -> Vec<String>
    where
        F: FnMut(&str) -> Option<String>,
    {
        lists
            .iter()
            .flat_map(|list| {
                list.children()
                    .filter_map(ElementRef::wrap)
                    .filter(|child| child.value().name() == "li")
            })
            .map(|item| element_text(&item))
            .filter(|text| !text.is_empty() && text.len() <= MAX_ITEM_LEN)
            .filter(|text| !self.is_navigation(text))
            .filter_map(|text| transform(&text))
            .collect()
    }

    fn is_navigation(&self, text: &str) -> bool {
        let folded = fold(text);
        let folded = folded.trim_matches(|c: char| !c.is_alphanumeric());
        self.keywords.stop_words.iter().any(|word| folded == *word)
    }

    /// Drops "1.", "2)", "Étape 3 :" and the like from the start of a step.
    fn strip_step_number(&self, text: &str) -> Option<String> {
        let folded = fold(text);
        let stripped = match self.step_number.find(&folded) {
            // Folding keeps one char per char in the prefix, so skip by chars
            Some(m) => {
                let prefix_chars = folded[..m.end()].chars().count();
                text.chars().skip(prefix_chars).collect::<String>()
            }
            None => text.to_string(),
        };
        non_empty(stripped)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeadingScope {
    /// No matching heading in effect
    Outside,
    /// A matching heading was seen, no list yet
    Open,
    /// Lists are being collected under the heading
    Collecting,
}

fn is_inside_list(element: &ElementRef) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| matches!(ancestor.value().name(), "ul" | "ol"))
}

fn is_page_chrome(list: &ElementRef) -> bool {
    list.ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| PAGE_CHROME.contains(&ancestor.value().name()))
}

fn carries_pattern(list: &ElementRef, patterns: &[&str]) -> bool {
    std::iter::once(*list)
        .chain(list.ancestors().filter_map(ElementRef::wrap))
        .take(CLASS_SEARCH_DEPTH + 1)
        .any(|element| {
            let value = element.value();
            let markers = format!(
                "{} {}",
                value.attr("class").unwrap_or_default(),
                value.attr("id").unwrap_or_default()
            );
            let markers = fold(&markers);
            patterns.iter().any(|pattern| markers.contains(pattern))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_prefers_h1_then_og_title_then_title() {
        let document = Html::parse_document(
            r#"<html><head><title>Titre | Site</title><meta property="og:title" content="Titre OG"></head>
            <body><h1> Soupe   maison </h1></body></html>"#,
        );
        assert_eq!(
            HtmlHeuristicExtractor::new(&document).name().as_deref(),
            Some("Soupe maison")
        );

        let document = Html::parse_document(
            r#"<html><head><title>Titre | Site</title><meta property="og:title" content="Titre OG"></head><body></body></html>"#,
        );
        assert_eq!(
            HtmlHeuristicExtractor::new(&document).name().as_deref(),
            Some("Titre OG")
        );

        let document =
            Html::parse_document("<html><head><title>Titre | Site</title></head><body><h1></h1></body></html>");
        assert_eq!(
            HtmlHeuristicExtractor::new(&document).name().as_deref(),
            Some("Titre | Site")
        );

        let document = Html::parse_document("<html><body><p>rien</p></body></html>");
        assert_eq!(HtmlHeuristicExtractor::new(&document).name(), None);
    }

    #[test]
    fn test_ingredients_under_heading_in_order() {
        let document = Html::parse_document(
            r#"
            <html><body>
                <ul class="menu"><li>Accueil</li><li>Recettes</li></ul>
                <h2>Ingrédients</h2>
                <ul>
                    <li>1 poireau</li>
                    <li>3 pommes de terre</li>
                    <li></li>
                    <li>1 l d'eau</li>
                    <li>Sel, poivre</li>
                </ul>
                <h2>Commentaires</h2>
                <ul><li>Super recette !</li></ul>
            </body></html>
            "#,
        );
        let extractor = HtmlHeuristicExtractor::new(&document);

        assert_eq!(
            extractor.ingredients().unwrap(),
            vec!["1 poireau", "3 pommes de terre", "1 l d'eau", "Sel, poivre"]
        );
        assert_eq!(extractor.steps(), None);
    }

    #[test]
    fn test_ingredients_by_class_pattern() {
        let document = Html::parse_document(
            r#"
            <html><body>
                <div class="recipe-ingredients-block">
                    <div><ul><li>200 g de farine</li><li>2 oeufs</li></ul></div>
                </div>
                <ul id="nav"><li>Accueil</li></ul>
            </body></html>
            "#,
        );

        assert_eq!(
            HtmlHeuristicExtractor::new(&document).ingredients().unwrap(),
            vec!["200 g de farine", "2 oeufs"]
        );
    }

    #[test]
    fn test_steps_strip_leading_numbers() {
        let document = Html::parse_document(
            r#"
            <html><body>
                <h3>Préparation</h3>
                <ol>
                    <li>1. Éplucher les légumes.</li>
                    <li>2) Couper en dés.</li>
                    <li>Étape 3 : Cuire 20 minutes.</li>
                    <li>180°C pendant 10 minutes.</li>
                    <li>Imprimer</li>
                </ol>
            </body></html>
            "#,
        );

        assert_eq!(
            HtmlHeuristicExtractor::new(&document).steps().unwrap(),
            vec![
                "Éplucher les légumes.",
                "Couper en dés.",
                "Cuire 20 minutes.",
                "180°C pendant 10 minutes."
            ]
        );
    }

    #[test]
    fn test_nested_lists_are_not_scanned_twice() {
        let document = Html::parse_document(
            r#"
            <html><body>
                <h2>Ingredients</h2>
                <ul>
                    <li>Pâte<ul><li>farine</li></ul></li>
                    <li>beurre</li>
                </ul>
            </body></html>
            "#,
        );

        assert_eq!(
            HtmlHeuristicExtractor::new(&document).ingredients().unwrap(),
            vec!["Pâte farine", "beurre"]
        );
    }

    #[test]
    fn test_footer_list_after_steps_is_ignored() {
        let document = Html::parse_document(
            r#"
            <html><body>
                <h2>Préparation</h2>
                <ol><li>1. Couper</li><li>2. Cuire</li></ol>
                <footer>
                    <ul><li>Contact</li><li>Mentions légales</li><li>Plan du site</li></ul>
                </footer>
            </body></html>
            "#,
        );

        assert_eq!(
            HtmlHeuristicExtractor::new(&document).steps().unwrap(),
            vec!["Couper", "Cuire"]
        );
    }

    #[test]
    fn test_paragraph_label_ends_heading_scope() {
        let document = Html::parse_document(
            r#"
            <html><body>
                <h2>Ingrédients</h2>
                <p>Pour 4 personnes</p>
                <ul><li>2 courgettes</li><li>1 oignon</li></ul>
                <p>Préparation</p>
                <ol><li>Émincer.</li><li>Faire revenir.</li></ol>
                <aside><h3>Ingrédients similaires</h3><ul><li>Aubergine</li></ul></aside>
            </body></html>
            "#,
        );

        assert_eq!(
            HtmlHeuristicExtractor::new(&document).ingredients().unwrap(),
            vec!["2 courgettes", "1 oignon"]
        );
    }

    #[test]
    fn test_navigation_lists_never_match_class_patterns() {
        let document = Html::parse_document(
            r#"
            <html><body>
                <nav class="steps-menu"><ul><li>Étape suivante</li></ul></nav>
                <div class="recipe-steps"><ol><li>Mélanger.</li></ol></div>
            </body></html>
            "#,
        );

        assert_eq!(
            HtmlHeuristicExtractor::new(&document).steps().unwrap(),
            vec!["Mélanger."]
        );
    }

    #[test]
    fn test_meta_description_wins_over_og_description() {
        let document = Html::parse_document(
            r#"<html><head>
                <meta property="og:description" content="Description OG">
                <meta name="description" content="Description principale">
            </head></html>"#,
        );
        assert_eq!(
            HtmlHeuristicExtractor::new(&document).description().as_deref(),
            Some("Description principale")
        );

        let document = Html::parse_document(
            r#"<html><head><meta property="og:description" content="Description OG"></head></html>"#,
        );
        assert_eq!(
            HtmlHeuristicExtractor::new(&document).description().as_deref(),
            Some("Description OG")
        );
    }

    #[test]
    fn test_description_from_meta() {
        let document = Html::parse_document(
            r#"<html><head><meta name="description" content="Une soupe &amp; du pain"></head></html>"#,
        );
        assert_eq!(
            HtmlHeuristicExtractor::new(&document).description().as_deref(),
            Some("Une soupe & du pain")
        );
    }

    #[test]
    fn test_nothing_found() {
        let document = Html::parse_document("<html><body><p>Bonjour</p></body></html>");
        let extractor = HtmlHeuristicExtractor::new(&document);

        assert_eq!(extractor.ingredients(), None);
        assert_eq!(extractor.steps(), None);
        assert_eq!(extractor.description(), None);
    }
}
