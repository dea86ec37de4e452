//! Duration strings to whole minutes.
//!
//! Two grammars are recognised and nothing else:
//!
//! * compact: an optional `PT` marker followed by `<n>H` and/or `<n>M`
//!   (`PT1H30M`, `PT15M`, `1h30m`)
//! * natural language: `1h 30`, `1 heure 30 minutes`, `45min`, or a bare
//!   integer taken as minutes
//!
//! Anything else is an unknown duration and yields `None`.

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::keywords::{fold, LocaleKeywords, FRENCH};

static DEFAULT_PARSER: Lazy<DurationParser> = Lazy::new(|| DurationParser::new(&FRENCH));

/// Parse a duration with the default locale tables.
pub fn parse_minutes(raw: Option<&str>) -> Option<u32> {
    DEFAULT_PARSER.parse(raw)
}

pub struct DurationParser {
    compact: Regex,
    hours_then_minutes: Regex,
    words: Regex,
    short_minutes: Regex,
    bare: Regex,
}

impl DurationParser {
    pub fn new(keywords: &LocaleKeywords) -> Self {
        let hour_short = alternation(keywords.hour_short);
        let hour_words = alternation(keywords.hour_words);
        let minute_words = alternation(keywords.minute_words);
        let minute_short = alternation(keywords.minute_short);

        Self {
            compact: compile(r"^(?:pt)?(?:(\d+)h)?(?:(\d+)m)?$"),
            hours_then_minutes: compile(&format!(r"^(\d+)\s*(?:{hour_short})\s*(\d+)$")),
            words: compile(&format!(
                r"^(?:(\d+)\s*(?:{hour_words}))?\s*(?:(\d+)\s*(?:{minute_words}))?$"
            )),
            short_minutes: compile(&format!(r"^(\d+)\s*(?:{minute_short})$")),
            bare: compile(r"^(\d+)$"),
        }
    }

    /// Convert a duration string to minutes; `None` when it matches neither grammar.
    pub fn parse(&self, raw: Option<&str>) -> Option<u32> {
        let normalized = fold(raw?.trim());
        if normalized.is_empty() {
            return None;
        }

        let minutes = self
            .parse_compact(&normalized)
            .or_else(|| self.parse_natural(&normalized));
        if minutes.is_none() {
            debug!("Unrecognised duration: {:?}", normalized);
        }
        minutes
    }

    fn parse_compact(&self, text: &str) -> Option<u32> {
        let caps = self.compact.captures(text)?;
        hours_and_minutes(caps.get(1), caps.get(2))
    }

    fn parse_natural(&self, text: &str) -> Option<u32> {
        if let Some(caps) = self.hours_then_minutes.captures(text) {
            return hours_and_minutes(caps.get(1), caps.get(2));
        }
        if let Some(caps) = self.words.captures(text) {
            return hours_and_minutes(caps.get(1), caps.get(2));
        }
        if let Some(caps) = self.short_minutes.captures(text) {
            return hours_and_minutes(None, caps.get(1));
        }
        let caps = self.bare.captures(text)?;
        hours_and_minutes(None, caps.get(1))
    }
}

/// At least one component must be present; overflow counts as unparseable.
fn hours_and_minutes(hours: Option<regex::Match>, minutes: Option<regex::Match>) -> Option<u32> {
    if hours.is_none() && minutes.is_none() {
        return None;
    }
    let hours: u32 = match hours {
        Some(m) => m.as_str().parse().ok()?,
        None => 0,
    };
    let minutes: u32 = match minutes {
        Some(m) => m.as_str().parse().ok()?,
        None => 0,
    };
    hours.checked_mul(60)?.checked_add(minutes)
}

fn alternation(words: &[&str]) -> String {
    // Longest first so "heures" is not cut short by "heure"
    let mut words: Vec<&str> = words.to_vec();
    words.sort_by_key(|w| std::cmp::Reverse(w.len()));
    words
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|")
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("duration pattern is valid")
}
