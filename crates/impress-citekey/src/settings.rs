//! Cite key settings
//!
//! Settings live in the host's preference store as two string entries. They
//! are loaded on every generation call, and anything missing or corrupted
//! falls back to the defaults instead of failing.

use serde::{Deserialize, Serialize};

use crate::template::{validate_template, TemplateValidation};

/// Preference key for the template string
pub const PREF_TEMPLATE: &str = "extensions.clavicularius.template";
/// Preference key for the number of title words
pub const PREF_TITLE_WORDS: &str = "extensions.clavicularius.titleWords";

pub const DEFAULT_TEMPLATE: &str = "{auth}{year}";
pub const DEFAULT_TITLE_WORDS: usize = 3;

/// Value some hosts persist after writing an unset JavaScript value
const CORRUPTED_VALUE: &str = "undefined";

/// Host key-value preference store.
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String);
}

/// Template and title word count used for key generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CiteKeySettings {
    pub template: String,
    pub title_word_count: usize,
}

impl Default for CiteKeySettings {
    fn default() -> Self {
        Self {
            template: DEFAULT_TEMPLATE.to_string(),
            title_word_count: DEFAULT_TITLE_WORDS,
        }
    }
}

impl CiteKeySettings {
    pub fn new(template: impl Into<String>, title_word_count: usize) -> Self {
        Self {
            template: template.into(),
            title_word_count,
        }
    }

    /// Read settings from the store, substituting defaults for missing or
    /// corrupted entries.
    pub fn load(store: &dyn PreferenceStore) -> Self {
        let template = read_pref(store, PREF_TEMPLATE)
            .unwrap_or_else(|| DEFAULT_TEMPLATE.to_string());
        let title_word_count = read_pref(store, PREF_TITLE_WORDS)
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(DEFAULT_TITLE_WORDS);

        Self {
            template,
            title_word_count,
        }
    }

    /// Write both entries to the store
    pub fn save(&self, store: &dyn PreferenceStore) {
        store.set(PREF_TEMPLATE, self.template.clone());
        store.set(PREF_TITLE_WORDS, self.title_word_count.to_string());
    }

    /// Validate the template
    pub fn validate(&self) -> TemplateValidation {
        validate_template(&self.template)
    }

    /// Load settings from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json_str)
    }

    /// Serialize settings to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Write defaults for any entry that is missing or corrupted.
///
/// Returns the number of entries written.
pub fn seed_defaults(store: &dyn PreferenceStore) -> usize {
    let mut written = 0;
    if read_pref(store, PREF_TEMPLATE).is_none() {
        store.set(PREF_TEMPLATE, DEFAULT_TEMPLATE.to_string());
        written += 1;
    }
    if read_pref(store, PREF_TITLE_WORDS).is_none() {
        store.set(PREF_TITLE_WORDS, DEFAULT_TITLE_WORDS.to_string());
        written += 1;
    }
    if written > 0 {
        tracing::info!("Seeded {} default cite key preference(s)", written);
    }
    written
}

fn read_pref(store: &dyn PreferenceStore, key: &str) -> Option<String> {
    store
        .get(key)
        .filter(|v| !v.is_empty() && v != CORRUPTED_VALUE)
}
