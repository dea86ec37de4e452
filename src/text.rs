use html_escape::decode_html_entities;
use scraper::{ElementRef, Html};

/// Decode entities, drop inline markup and collapse whitespace.
pub fn clean_text(text: &str) -> String {
    // Some sites double-encode entities ("&amp;eacute;")
    let decoded = decode_html_entities(&decode_html_entities(text)).into_owned();
    let plain = if decoded.contains('<') {
        Html::parse_fragment(&decoded)
            .root_element()
            .text()
            .collect::<Vec<_>>()
            .join(" ")
    } else {
        decoded
    };
    collapse_whitespace(&plain)
}

/// All text below an element, whitespace-collapsed.
pub fn element_text(element: &ElementRef) -> String {
    collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Trimmed, non-empty text or `None`.
pub fn non_empty(text: String) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == text.len() {
        Some(text)
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_decodes_entities() {
        assert_eq!(clean_text("Cr&egrave;me br&ucirc;l&eacute;e"), "Crème brûlée");
        assert_eq!(clean_text("Sel &amp;amp; poivre"), "Sel & poivre");
    }

    #[test]
    fn test_clean_text_strips_tags_and_whitespace() {
        assert_eq!(
            clean_text("<p>Préchauffer   le four</p>\n<p>à 180°C</p>"),
            "Préchauffer le four à 180°C"
        );
        assert_eq!(clean_text("&lt;b&gt;Mélanger&lt;/b&gt;"), "Mélanger");
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty("  ".to_string()), None);
        assert_eq!(non_empty(" x ".to_string()), Some("x".to_string()));
        assert_eq!(non_empty("x".to_string()), Some("x".to_string()));
    }
}
