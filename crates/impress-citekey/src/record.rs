//! Host record capabilities
//!
//! The core never touches the host's object model directly. A host exposes
//! its items through [`Record`] and its collection through [`Library`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Host-assigned item identifier
pub type ItemId = i64;

/// Field holding the citation key
pub const CITATION_KEY_FIELD: &str = "citationKey";
/// Field read by the title resolvers
pub const TITLE_FIELD: &str = "title";
/// Field read by the year resolver
pub const DATE_FIELD: &str = "date";

/// A creator (author, editor, ...) attached to a record.
///
/// Hosts populate at least one of the three names. Single-field creators
/// such as institutions only carry `name`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Creator {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Creator {
    /// Creator with only a last name
    pub fn with_last_name(last_name: impl Into<String>) -> Self {
        Self {
            last_name: Some(last_name.into()),
            ..Self::default()
        }
    }

    /// Creator with first and last name
    pub fn person(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            last_name: Some(last_name.into()),
            first_name: Some(first_name.into()),
            name: None,
        }
    }

    /// Single-field creator (e.g. an organization)
    pub fn single(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// The name used for keys: last name, else single-field name, else
    /// first name. Empty strings are skipped.
    pub fn key_name(&self) -> Option<&str> {
        [&self.last_name, &self.name, &self.first_name]
            .into_iter()
            .filter_map(|n| n.as_deref())
            .find(|n| !n.is_empty())
    }
}

/// A mutable handle to one host item.
#[async_trait]
pub trait Record: Send + Sync {
    /// Host identifier, used for logging and failure reports
    fn id(&self) -> ItemId;

    /// Creators in host order
    fn creators(&self) -> Vec<Creator>;

    /// Read a field. Absent fields return `None`.
    fn field(&self, name: &str) -> Option<String>;

    /// Stage a field value; nothing is persisted until [`Record::save`].
    fn set_field(&mut self, name: &str, value: &str);

    /// Whether this is a bibliographic item rather than an attachment or note
    fn is_regular_item(&self) -> bool;

    /// Persist staged changes transactionally.
    async fn save(&mut self) -> Result<(), StoreError>;

    /// Current citation key, treating an empty value as absent
    fn citation_key(&self) -> Option<String> {
        self.field(CITATION_KEY_FIELD).filter(|k| !k.is_empty())
    }
}

/// The host's active library.
#[async_trait]
pub trait Library: Send + Sync {
    type Item: Record + 'static;

    /// Every item in the library, in the host's enumeration order
    async fn all_items(&self) -> Result<Vec<Self::Item>, StoreError>;

    /// Resolve one item. `Ok(None)` when the id no longer exists.
    async fn get_item(&self, id: ItemId) -> Result<Option<Self::Item>, StoreError>;
}
