//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::sync::Arc;

use impress_citekey::{
    Creator, ItemData, ItemProcessor, KeyGenerator, MemoryPreferences, CITATION_KEY_FIELD,
    DATE_FIELD, TITLE_FIELD,
};

pub const AUTHORS: [&str; 10] = [
    "Shannon", "Turing", "Hopper", "Lovelace", "Knuth", "Dijkstra", "Liskov", "Hamming", "Backus",
    "Ritchie",
];

/// Regular item with one author, a date and a title
pub fn paper(id: i64, author: &str, year: &str, title: &str) -> ItemData {
    ItemData::regular(id)
        .with_creator(Creator::with_last_name(author))
        .with_field(DATE_FIELD, year)
        .with_field(TITLE_FIELD, title)
}

/// Ten papers; the ones at indices 1, 3, 5 and 7 already carry a key
pub fn ten_papers() -> Vec<ItemData> {
    AUTHORS
        .iter()
        .enumerate()
        .map(|(i, author)| {
            let item = paper(
                i as i64 + 1,
                author,
                &format!("{}", 1940 + i),
                "On Computable Numbers",
            );
            if i % 2 == 1 && i < 8 {
                item.with_field(CITATION_KEY_FIELD, &format!("existing{}", i))
            } else {
                item
            }
        })
        .collect()
}

pub fn processor(prefs: Arc<MemoryPreferences>) -> ItemProcessor {
    ItemProcessor::new(KeyGenerator::new(prefs))
}
