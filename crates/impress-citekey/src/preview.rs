//! Key preview for the preferences pane

use std::fmt;

use crate::error::StoreError;
use crate::generator::KeyGenerator;
use crate::record::Record;

/// What the preview field should show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewText {
    Key(String),
    NoSelection,
    NotRegularItem,
    Failed,
}

impl fmt::Display for PreviewText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreviewText::Key(key) => f.write_str(key),
            PreviewText::NoSelection => f.write_str("(select an item to preview)"),
            PreviewText::NotRegularItem => f.write_str("(select a regular item to preview)"),
            PreviewText::Failed => f.write_str("(error generating preview)"),
        }
    }
}

/// Preview the key for the first selected item without saving anything.
///
/// `selection` is the host's current selection; a failed lookup shows the
/// error placeholder.
pub fn preview_key<R: Record>(
    generator: &KeyGenerator,
    selection: std::result::Result<&[R], StoreError>,
) -> PreviewText {
    let selected = match selection {
        Ok(items) => items,
        Err(e) => {
            tracing::debug!("Preview selection unavailable: {}", e);
            return PreviewText::Failed;
        }
    };

    match selected.first() {
        None => PreviewText::NoSelection,
        Some(item) if !item.is_regular_item() => PreviewText::NotRegularItem,
        Some(item) => PreviewText::Key(generator.generate_key(item)),
    }
}
