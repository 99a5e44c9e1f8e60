//! Library-wide backfill
//!
//! Runs the [`ItemProcessor`] over every item in enumeration order, one item
//! at a time. A failed save is logged and reported, then the sweep moves on.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::processor::ItemProcessor;
use crate::record::{ItemId, Library, Record};

/// Which items a backfill touches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackfillMode {
    /// Only items without a key
    FillMissing,
    /// Every regular item
    Overwrite,
}

impl BackfillMode {
    pub fn from_overwrite(overwrite: bool) -> Self {
        if overwrite {
            BackfillMode::Overwrite
        } else {
            BackfillMode::FillMissing
        }
    }

    pub fn overwrites(self) -> bool {
        self == BackfillMode::Overwrite
    }
}

/// An item whose key could not be saved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackfillFailure {
    pub item: ItemId,
    pub message: String,
}

/// Outcome of one backfill run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackfillReport {
    pub mode: BackfillMode,
    /// Items visited
    pub total: usize,
    /// Items whose key was assigned
    pub changed: usize,
    /// Items left untouched (ineligible, already keyed, empty key)
    pub skipped: usize,
    pub failed: Vec<BackfillFailure>,
}

impl BackfillReport {
    fn new(mode: BackfillMode) -> Self {
        Self {
            mode,
            total: 0,
            changed: 0,
            skipped: 0,
            failed: Vec::new(),
        }
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Drives the item processor across a whole library
pub struct Backfill<L: Library> {
    library: Arc<L>,
    processor: ItemProcessor,
}

impl<L: Library> Backfill<L> {
    pub fn new(library: Arc<L>, processor: ItemProcessor) -> Self {
        Self { library, processor }
    }

    /// Process every item and return the number of keys assigned.
    pub async fn run(&self, overwrite: bool) -> Result<usize> {
        Ok(self.run_with_report(BackfillMode::from_overwrite(overwrite)).await?.changed)
    }

    /// Process every item and return the full report.
    ///
    /// Fails only if the library cannot be enumerated.
    pub async fn run_with_report(&self, mode: BackfillMode) -> Result<BackfillReport> {
        let items = self.library.all_items().await?;
        let mut report = BackfillReport::new(mode);

        tracing::info!(items = items.len(), ?mode, "Starting cite key backfill");

        for mut item in items {
            report.total += 1;
            match self.processor.process(&mut item, mode.overwrites()).await {
                Ok(true) => report.changed += 1,
                Ok(false) => report.skipped += 1,
                Err(e) => {
                    tracing::warn!(item = item.id(), "Failed to save cite key: {}", e);
                    report.failed.push(BackfillFailure {
                        item: item.id(),
                        message: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            changed = report.changed,
            skipped = report.skipped,
            failed = report.failed.len(),
            "Cite key backfill finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::KeyGenerator;
    use crate::memory::{ItemData, MemoryLibrary, MemoryPreferences};
    use crate::record::{Creator, CITATION_KEY_FIELD, DATE_FIELD};

    fn backfill(library: &MemoryLibrary) -> Backfill<MemoryLibrary> {
        let generator = KeyGenerator::new(Arc::new(MemoryPreferences::new()));
        Backfill::new(Arc::new(library.clone()), ItemProcessor::new(generator))
    }

    fn item(id: ItemId, author: &str) -> ItemData {
        ItemData::regular(id)
            .with_creator(Creator::with_last_name(author))
            .with_field(DATE_FIELD, "2001")
    }

    #[tokio::test]
    async fn test_report_counts() {
        let library = MemoryLibrary::from_items(vec![
            item(1, "Knuth"),
            item(2, "Lamport").with_field(CITATION_KEY_FIELD, "latex"),
            ItemData::new(3, crate::memory::ItemType::Attachment),
        ]);

        let report = backfill(&library)
            .run_with_report(BackfillMode::FillMissing)
            .await
            .unwrap();
        assert_eq!(report.total, 3);
        assert_eq!(report.changed, 1);
        assert_eq!(report.skipped, 2);
        assert!(!report.has_failures());
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_sweep() {
        let library = MemoryLibrary::from_items(vec![
            item(1, "Knuth"),
            item(2, "Lamport"),
            item(3, "Dijkstra"),
        ]);
        library.reject_saves_for(2);

        let report = backfill(&library)
            .run_with_report(BackfillMode::FillMissing)
            .await
            .unwrap();
        assert_eq!(report.changed, 2);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].item, 2);
        assert_eq!(
            library.item(3).unwrap().field(CITATION_KEY_FIELD).as_deref(),
            Some("dijkstra2001")
        );
    }

    #[tokio::test]
    async fn test_empty_library() {
        let count = backfill(&MemoryLibrary::new()).run(true).await.unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_mode_from_overwrite() {
        assert_eq!(BackfillMode::from_overwrite(true), BackfillMode::Overwrite);
        assert!(!BackfillMode::from_overwrite(false).overwrites());
    }
}
