//! Host change notifications

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::record::ItemId;

/// Handle returned by [`Notifier::register_observer`]
pub type ObserverId = u64;

/// Kind of change reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifyEvent {
    Add,
    Modify,
    Delete,
    Trash,
}

/// Kind of entity a notification is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Item,
    Collection,
    Search,
    Tag,
}

/// Receives batches of changed ids from the host.
///
/// `notify` runs on the host's dispatch path and must not block.
pub trait Observer: Send + Sync {
    fn notify(&self, event: NotifyEvent, entity: EntityType, ids: &[ItemId]);
}

/// Host subscription API.
pub trait Notifier: Send + Sync {
    fn register_observer(&self, observer: Arc<dyn Observer>, entity_types: &[EntityType]) -> ObserverId;
    fn unregister_observer(&self, id: ObserverId);
}
