//! Change listener
//!
//! Gives newly added items a key as soon as the host reports them. Each
//! item is handled on its own task so notification dispatch never waits on
//! a save.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::runtime::Handle;
use tokio::task::JoinSet;

use crate::error::{CiteKeyError, Result};
use crate::notifier::{EntityType, Notifier, NotifyEvent, Observer, ObserverId};
use crate::processor::ItemProcessor;
use crate::record::{ItemId, Library, Record};

pub struct ChangeListener<L: Library + 'static> {
    library: Arc<L>,
    processor: ItemProcessor,
    runtime: Handle,
    tasks: Mutex<JoinSet<()>>,
}

impl<L: Library + 'static> ChangeListener<L> {
    /// Create a listener that spawns onto the current tokio runtime.
    pub fn new(library: Arc<L>, processor: ItemProcessor) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|e| CiteKeyError::NoRuntime(e.to_string()))?;
        Ok(Self::with_runtime(library, processor, runtime))
    }

    pub fn with_runtime(library: Arc<L>, processor: ItemProcessor, runtime: Handle) -> Self {
        Self {
            library,
            processor,
            runtime,
            tasks: Mutex::new(JoinSet::new()),
        }
    }

    /// Subscribe to item notifications
    pub fn register(self: &Arc<Self>, notifier: &dyn Notifier) -> ObserverId {
        let observer: Arc<dyn Observer> = self.clone();
        let id = notifier.register_observer(observer, &[EntityType::Item]);
        tracing::info!(observer = id, "Cite key listener registered");
        id
    }

    /// Number of spawned tasks not yet reaped
    pub fn in_flight(&self) -> usize {
        self.lock_tasks().len()
    }

    /// Wait for every task spawned so far. Returns how many finished.
    pub async fn wait_idle(&self) -> usize {
        let mut tasks = std::mem::take(&mut *self.lock_tasks());
        let mut finished = 0;
        while let Some(result) = tasks.join_next().await {
            if let Err(e) = result {
                tracing::warn!("Cite key task did not complete: {}", e);
            }
            finished += 1;
        }
        finished
    }

    fn lock_tasks(&self) -> MutexGuard<'_, JoinSet<()>> {
        self.tasks.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn spawn_for(&self, tasks: &mut JoinSet<()>, id: ItemId) {
        let library = self.library.clone();
        let processor = self.processor.clone();

        tasks.spawn_on(
            async move {
                let mut item = match library.get_item(id).await {
                    Ok(Some(item)) => item,
                    Ok(None) => {
                        tracing::debug!(item = id, "Added item is gone, nothing to key");
                        return;
                    }
                    Err(e) => {
                        tracing::warn!(item = id, "Failed to load added item: {}", e);
                        return;
                    }
                };

                match processor.process(&mut item, false).await {
                    Ok(true) => tracing::debug!(item = item.id(), "Keyed new item"),
                    Ok(false) => {}
                    Err(e) => tracing::warn!(item = item.id(), "Failed to key new item: {}", e),
                }
            },
            &self.runtime,
        );
    }
}

impl<L: Library + 'static> Observer for ChangeListener<L> {
    fn notify(&self, event: NotifyEvent, entity: EntityType, ids: &[ItemId]) {
        if entity != EntityType::Item || event != NotifyEvent::Add {
            return;
        }

        let mut tasks = self.lock_tasks();
        // Reap finished tasks so the set only holds work in flight
        while tasks.try_join_next().is_some() {}

        for &id in ids {
            self.spawn_for(&mut tasks, id);
        }
    }
}
