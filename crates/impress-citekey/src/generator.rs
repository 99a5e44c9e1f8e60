//! Cite key generation

use std::sync::Arc;

use crate::record::Record;
use crate::resolvers::{resolve_author, resolve_title_words, resolve_year, TitleStyle};
use crate::settings::{CiteKeySettings, PreferenceStore};
use crate::template::{render, Token};

/// Generate a cite key for `record` with explicit settings.
///
/// Pure: the result depends only on the record's fields and `settings`.
/// An empty result means there is nothing to assign.
pub fn generate_cite_key<R: Record + ?Sized>(record: &R, settings: &CiteKeySettings) -> String {
    render(&settings.template, |token| match token {
        Token::AuthorLower => resolve_author(record, false),
        Token::AuthorCapitalized => resolve_author(record, true),
        Token::Year => resolve_year(record),
        Token::TitleCamel => {
            resolve_title_words(record, settings.title_word_count, TitleStyle::Camel)
        }
        Token::TitleLower => {
            resolve_title_words(record, settings.title_word_count, TitleStyle::Lower)
        }
    })
}

/// Generates keys with the settings currently in the preference store.
#[derive(Clone)]
pub struct KeyGenerator {
    prefs: Arc<dyn PreferenceStore>,
}

impl KeyGenerator {
    pub fn new(prefs: Arc<dyn PreferenceStore>) -> Self {
        Self { prefs }
    }

    /// Settings as they are right now
    pub fn settings(&self) -> CiteKeySettings {
        CiteKeySettings::load(self.prefs.as_ref())
    }

    /// Generate a key without persisting anything
    pub fn generate_key<R: Record + ?Sized>(&self, record: &R) -> String {
        generate_cite_key(record, &self.settings())
    }
}

impl std::fmt::Debug for KeyGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyGenerator")
            .field("settings", &self.settings())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{ItemData, MemoryPreferences};
    use crate::record::{Creator, DATE_FIELD, TITLE_FIELD};
    use crate::settings::{PREF_TEMPLATE, PREF_TITLE_WORDS};

    fn gibbon() -> ItemData {
        ItemData::regular(1)
            .with_creator(Creator::person("Edward", "Gibbon"))
            .with_field(TITLE_FIELD, "The Rise and Fall of Empires")
            .with_field(DATE_FIELD, "1776-02-17")
    }

    #[test]
    fn test_default_template() {
        let key = generate_cite_key(&gibbon(), &CiteKeySettings::default());
        assert_eq!(key, "gibbon1776");
    }

    #[test]
    fn test_all_tokens() {
        let settings = CiteKeySettings::new("{Auth}{year}{title}|{auth}_{title_lower}", 2);
        assert_eq!(
            generate_cite_key(&gibbon(), &settings),
            "Gibbon1776RiseFall|gibbon_rise_fall"
        );
    }

    #[test]
    fn test_unknown_token_kept() {
        let settings = CiteKeySettings::new("{foo}{year}", 3);
        assert_eq!(generate_cite_key(&gibbon(), &settings), "{foo}1776");
    }

    #[test]
    fn test_empty_template() {
        let settings = CiteKeySettings::new("", 3);
        assert_eq!(generate_cite_key(&gibbon(), &settings), "");
    }

    #[test]
    fn test_all_tokens_empty() {
        let settings = CiteKeySettings::new("{auth}{title}", 3);
        assert_eq!(generate_cite_key(&ItemData::regular(1), &settings), "");
    }

    #[test]
    fn test_undated_record() {
        let item = ItemData::regular(1).with_creator(Creator::with_last_name("Anon"));
        assert_eq!(generate_cite_key(&item, &CiteKeySettings::default()), "anonnd");
    }

    #[test]
    fn test_generation_is_deterministic() {
        let settings = CiteKeySettings::new("{Auth}{year}{title}", 3);
        let item = gibbon();
        assert_eq!(
            generate_cite_key(&item, &settings),
            generate_cite_key(&item, &settings)
        );
    }

    #[test]
    fn test_generator_reads_current_prefs() {
        let prefs = Arc::new(MemoryPreferences::new());
        let generator = KeyGenerator::new(prefs.clone());
        assert_eq!(generator.generate_key(&gibbon()), "gibbon1776");

        prefs.set(PREF_TEMPLATE, "{Auth}_{title}".into());
        prefs.set(PREF_TITLE_WORDS, "1".into());
        assert_eq!(generator.generate_key(&gibbon()), "Gibbon_Rise");
    }

    #[test]
    fn test_generator_falls_back_on_corrupted_prefs() {
        let prefs = Arc::new(MemoryPreferences::new());
        prefs.set(PREF_TEMPLATE, "undefined".into());
        prefs.set(PREF_TITLE_WORDS, "lots".into());
        let generator = KeyGenerator::new(prefs);
        assert_eq!(generator.generate_key(&gibbon()), "gibbon1776");
    }
}
