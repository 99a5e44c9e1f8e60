//! Service lifecycle
//!
//! [`CiteKeyService::startup`] wires the generator, processor, backfill and
//! change listener to one host, and [`CiteKeyService::shutdown`] takes the
//! listener down again. Hosts start the service once and keep it for the
//! whole session.

use std::sync::Arc;

use crate::backfill::{Backfill, BackfillMode, BackfillReport};
use crate::error::{Result, StoreError};
use crate::generator::KeyGenerator;
use crate::listener::ChangeListener;
use crate::notifier::{Notifier, ObserverId};
use crate::preview::{preview_key, PreviewText};
use crate::processor::ItemProcessor;
use crate::record::{Library, Record};
use crate::settings::{seed_defaults, CiteKeySettings, PreferenceStore};
use crate::status::BatchStatus;

pub struct CiteKeyService<L: Library + 'static> {
    generator: KeyGenerator,
    processor: ItemProcessor,
    backfill: Backfill<L>,
    listener: Arc<ChangeListener<L>>,
    notifier: Arc<dyn Notifier>,
    observer: ObserverId,
}

impl<L: Library + 'static> CiteKeyService<L> {
    /// Seed default preferences and start listening for new items.
    ///
    /// Must be called from within a tokio runtime.
    pub fn startup(
        library: Arc<L>,
        prefs: Arc<dyn PreferenceStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self> {
        seed_defaults(prefs.as_ref());

        let generator = KeyGenerator::new(prefs);
        let processor = ItemProcessor::new(generator.clone());
        let listener = Arc::new(ChangeListener::new(library.clone(), processor.clone())?);
        let observer = listener.register(notifier.as_ref());

        tracing::info!("Cite key service started");
        Ok(Self {
            generator,
            backfill: Backfill::new(library, processor.clone()),
            processor,
            listener,
            notifier,
            observer,
        })
    }

    /// Settings currently in effect
    pub fn settings(&self) -> CiteKeySettings {
        self.generator.settings()
    }

    /// Key `record` would get, without saving anything
    pub fn generate_key<R: Record + ?Sized>(&self, record: &R) -> String {
        self.generator.generate_key(record)
    }

    /// Assign a key to one item
    pub async fn process<R: Record + ?Sized>(&self, record: &mut R, overwrite: bool) -> Result<bool> {
        self.processor.process(record, overwrite).await
    }

    /// Key every item in the library; returns the number of keys assigned
    pub async fn backfill(&self, overwrite: bool) -> Result<usize> {
        self.backfill.run(overwrite).await
    }

    pub async fn backfill_report(&self, mode: BackfillMode) -> Result<BackfillReport> {
        self.backfill.run_with_report(mode).await
    }

    /// Run a backfill and describe the outcome for the user
    pub async fn backfill_status(&self, overwrite: bool) -> BatchStatus {
        let result = self.backfill(overwrite).await;
        BatchStatus::from_result(&result, BackfillMode::from_overwrite(overwrite))
    }

    pub fn preview<R: Record>(&self, selection: std::result::Result<&[R], StoreError>) -> PreviewText {
        preview_key(&self.generator, selection)
    }

    pub fn listener(&self) -> &ChangeListener<L> {
        &self.listener
    }

    /// Stop listening and wait for in-flight listener tasks.
    ///
    /// Returns the number of tasks that were still pending.
    pub async fn shutdown(self) -> usize {
        self.notifier.unregister_observer(self.observer);
        let pending = self.listener.wait_idle().await;
        tracing::info!(pending, "Cite key service stopped");
        pending
    }
}
