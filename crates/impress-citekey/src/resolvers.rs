//! Token resolvers
//!
//! Each resolver computes the value of one template token from a record.
//! They are pure: the same record always yields the same value, and an
//! unusable record yields an empty string (or `nd` for the year) rather
//! than an error.

use lazy_static::lazy_static;
use regex::Regex;

use crate::normalize::{capitalize, is_stop_word, strip_diacritics};
use crate::record::{Record, DATE_FIELD, TITLE_FIELD};

/// Year placeholder for undated records
pub const NO_DATE: &str = "nd";

lazy_static! {
    static ref YEAR_RE: Regex = Regex::new(r"[0-9]{4}").unwrap();
    static ref NON_WORD_RE: Regex = Regex::new(r"[^0-9A-Za-z_\s]").unwrap();
}

/// How selected title words are joined
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleStyle {
    /// `RiseFallEmpires`
    Camel,
    /// `rise_fall_empires`
    Lower,
}

/// Last name of the first creator, ASCII letters only.
pub fn resolve_author<R: Record + ?Sized>(record: &R, capitalized: bool) -> String {
    let creators = record.creators();
    let name = match creators.first().and_then(|c| c.key_name()) {
        Some(name) => name,
        None => return String::new(),
    };

    let clean: String = strip_diacritics(name)
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .collect();

    if capitalized {
        capitalize(&clean)
    } else {
        clean.to_ascii_lowercase()
    }
}

/// First `count` significant title words, joined per `style`.
pub fn resolve_title_words<R: Record + ?Sized>(record: &R, count: usize, style: TitleStyle) -> String {
    let title = record.field(TITLE_FIELD).unwrap_or_default();
    let words = significant_words(&title, count);

    match style {
        TitleStyle::Camel => words.iter().map(|w| capitalize(w)).collect(),
        TitleStyle::Lower => words
            .iter()
            .map(|w| w.to_lowercase())
            .collect::<Vec<_>>()
            .join("_"),
    }
}

/// First four-digit run in the date field, or `nd`.
pub fn resolve_year<R: Record + ?Sized>(record: &R) -> String {
    let date = record.field(DATE_FIELD).unwrap_or_default();
    YEAR_RE
        .find(&date)
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| NO_DATE.to_string())
}

/// Words longer than one character that are not stop words, in title order
fn significant_words(title: &str, count: usize) -> Vec<String> {
    let stripped = strip_diacritics(title);
    let cleaned = NON_WORD_RE.replace_all(&stripped, "");

    cleaned
        .split_whitespace()
        .filter(|w| w.len() > 1 && !is_stop_word(w))
        .take(count)
        .map(str::to_string)
        .collect()
}
