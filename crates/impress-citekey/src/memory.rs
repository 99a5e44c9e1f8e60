//! In-memory host
//!
//! A self-contained implementation of the host traits. The CLI runs on it
//! with items loaded from JSON, and it doubles as the test backend.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::notifier::{EntityType, Notifier, NotifyEvent, Observer, ObserverId};
use crate::record::{Creator, ItemId, Library, Record};
use crate::settings::PreferenceStore;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Item classification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    #[default]
    Regular,
    Attachment,
    Note,
}

/// Plain item data.
///
/// Also usable as a detached [`Record`]: field edits stay local and
/// `save` always succeeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemData {
    pub id: ItemId,
    #[serde(default)]
    pub item_type: ItemType,
    #[serde(default)]
    pub creators: Vec<Creator>,
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
}

impl ItemData {
    pub fn new(id: ItemId, item_type: ItemType) -> Self {
        Self {
            id,
            item_type,
            creators: Vec::new(),
            fields: BTreeMap::new(),
        }
    }

    pub fn regular(id: ItemId) -> Self {
        Self::new(id, ItemType::Regular)
    }

    pub fn with_creator(mut self, creator: Creator) -> Self {
        self.creators.push(creator);
        self
    }

    pub fn with_field(mut self, name: &str, value: &str) -> Self {
        self.fields.insert(name.to_string(), value.to_string());
        self
    }
}

#[async_trait]
impl Record for ItemData {
    fn id(&self) -> ItemId {
        self.id
    }

    fn creators(&self) -> Vec<Creator> {
        self.creators.clone()
    }

    fn field(&self, name: &str) -> Option<String> {
        self.fields.get(name).cloned()
    }

    fn set_field(&mut self, name: &str, value: &str) {
        self.fields.insert(name.to_string(), value.to_string());
    }

    fn is_regular_item(&self) -> bool {
        self.item_type == ItemType::Regular
    }

    async fn save(&mut self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[derive(Debug, Default)]
struct LibraryState {
    items: Vec<ItemData>,
    rejected: HashSet<ItemId>,
    saves: usize,
}

/// Ordered in-memory item collection.
///
/// Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct MemoryLibrary {
    state: Arc<Mutex<LibraryState>>,
}

impl MemoryLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: Vec<ItemData>) -> Self {
        let library = Self::new();
        lock(&library.state).items = items;
        library
    }

    /// Add an item, replacing any item with the same id
    pub fn insert(&self, item: ItemData) {
        let mut state = lock(&self.state);
        match state.items.iter_mut().find(|i| i.id == item.id) {
            Some(existing) => *existing = item,
            None => state.items.push(item),
        }
    }

    /// Stored copy of one item
    pub fn item(&self, id: ItemId) -> Option<ItemData> {
        lock(&self.state).items.iter().find(|i| i.id == id).cloned()
    }

    /// Stored copy of every item, in order
    pub fn items(&self) -> Vec<ItemData> {
        lock(&self.state).items.clone()
    }

    pub fn len(&self) -> usize {
        lock(&self.state).items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Make every later save of `id` fail
    pub fn reject_saves_for(&self, id: ItemId) {
        lock(&self.state).rejected.insert(id);
    }

    /// Number of successful saves so far
    pub fn save_count(&self) -> usize {
        lock(&self.state).saves
    }

    /// Load items from a JSON array
    pub fn from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        let items: Vec<ItemData> = serde_json::from_str(json_str)?;
        Ok(Self::from_items(items))
    }

    /// Serialize items to a JSON array
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.items())
    }

    fn handle(&self, data: ItemData) -> MemoryItem {
        MemoryItem {
            data,
            library: self.clone(),
        }
    }

    fn write_back(&self, data: &ItemData) -> Result<(), StoreError> {
        let mut state = lock(&self.state);
        if state.rejected.contains(&data.id) {
            return Err(StoreError::Rejected(data.id, "save rejected by store".to_string()));
        }
        let slot = state
            .items
            .iter_mut()
            .find(|i| i.id == data.id)
            .ok_or(StoreError::NotFound(data.id))?;
        *slot = data.clone();
        state.saves += 1;
        Ok(())
    }
}

#[async_trait]
impl Library for MemoryLibrary {
    type Item = MemoryItem;

    async fn all_items(&self) -> Result<Vec<MemoryItem>, StoreError> {
        Ok(self.items().into_iter().map(|d| self.handle(d)).collect())
    }

    async fn get_item(&self, id: ItemId) -> Result<Option<MemoryItem>, StoreError> {
        Ok(self.item(id).map(|d| self.handle(d)))
    }
}

/// Working copy of one library item. Edits reach the library on `save`.
#[derive(Debug, Clone)]
pub struct MemoryItem {
    data: ItemData,
    library: MemoryLibrary,
}

impl MemoryItem {
    pub fn data(&self) -> &ItemData {
        &self.data
    }
}

#[async_trait]
impl Record for MemoryItem {
    fn id(&self) -> ItemId {
        self.data.id
    }

    fn creators(&self) -> Vec<Creator> {
        self.data.creators.clone()
    }

    fn field(&self, name: &str) -> Option<String> {
        self.data.field(name)
    }

    fn set_field(&mut self, name: &str, value: &str) {
        self.data.set_field(name, value);
    }

    fn is_regular_item(&self) -> bool {
        self.data.is_regular_item()
    }

    async fn save(&mut self) -> Result<(), StoreError> {
        // Let other tasks run, as a real store would while awaiting the write
        tokio::task::yield_now().await;
        self.library.write_back(&self.data)
    }
}

/// String preferences held in memory
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a flat JSON object. Non-string values are stored in their
    /// JSON form, so `{"...titleWords": 3}` reads back as `"3"`.
    pub fn from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        let raw: HashMap<String, serde_json::Value> = serde_json::from_str(json_str)?;
        let values = raw
            .into_iter()
            .map(|(k, v)| match v {
                serde_json::Value::String(s) => (k, s),
                other => (k, other.to_string()),
            })
            .collect();
        Ok(Self {
            values: Mutex::new(values),
        })
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let values: BTreeMap<String, String> = lock(&self.values)
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        serde_json::to_string_pretty(&values)
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.values).get(key).cloned()
    }

    fn set(&self, key: &str, value: String) {
        lock(&self.values).insert(key.to_string(), value);
    }
}

struct Registration {
    id: ObserverId,
    observer: Arc<dyn Observer>,
    entity_types: Vec<EntityType>,
}

/// Synchronous notification dispatcher
#[derive(Default)]
pub struct MemoryNotifier {
    registrations: Mutex<Vec<Registration>>,
    next_id: Mutex<ObserverId>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver an event to every observer registered for `entity`
    pub fn notify(&self, event: NotifyEvent, entity: EntityType, ids: &[ItemId]) {
        let observers: Vec<Arc<dyn Observer>> = lock(&self.registrations)
            .iter()
            .filter(|r| r.entity_types.contains(&entity))
            .map(|r| r.observer.clone())
            .collect();
        for observer in observers {
            observer.notify(event, entity, ids);
        }
    }

    pub fn observer_count(&self) -> usize {
        lock(&self.registrations).len()
    }
}

impl Notifier for MemoryNotifier {
    fn register_observer(&self, observer: Arc<dyn Observer>, entity_types: &[EntityType]) -> ObserverId {
        let id = {
            let mut next = lock(&self.next_id);
            *next += 1;
            *next
        };
        lock(&self.registrations).push(Registration {
            id,
            observer,
            entity_types: entity_types.to_vec(),
        });
        id
    }

    fn unregister_observer(&self, id: ObserverId) {
        lock(&self.registrations).retain(|r| r.id != id);
    }
}
