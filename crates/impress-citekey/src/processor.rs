//! Per-item key assignment

use crate::error::Result;
use crate::generator::KeyGenerator;
use crate::record::{Record, CITATION_KEY_FIELD};

/// Decides whether an item gets a (new) key and writes it back.
#[derive(Debug, Clone)]
pub struct ItemProcessor {
    generator: KeyGenerator,
}

impl ItemProcessor {
    pub fn new(generator: KeyGenerator) -> Self {
        Self { generator }
    }

    pub fn generator(&self) -> &KeyGenerator {
        &self.generator
    }

    /// Assign a key to `record` and save it.
    ///
    /// Returns `Ok(false)` without touching the record when it is not a
    /// regular item, already has a key and `overwrite` is off, or the
    /// template renders to an empty key. Save failures are returned as
    /// errors.
    pub async fn process<R: Record + ?Sized>(&self, record: &mut R, overwrite: bool) -> Result<bool> {
        if !record.is_regular_item() {
            tracing::debug!(item = record.id(), "Skipping non-regular item");
            return Ok(false);
        }

        if !overwrite && record.citation_key().is_some() {
            tracing::debug!(item = record.id(), "Item already has a cite key");
            return Ok(false);
        }

        let key = self.generator.generate_key(record);
        if key.is_empty() {
            tracing::debug!(item = record.id(), "Template rendered an empty cite key");
            return Ok(false);
        }

        record.set_field(CITATION_KEY_FIELD, &key);
        record.save().await?;
        tracing::debug!(item = record.id(), key = %key, "Assigned cite key");
        Ok(true)
    }
}
