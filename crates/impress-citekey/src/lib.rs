//! Citation key generation and synchronization
//!
//! This crate turns bibliographic records into short, deterministic cite
//! keys and keeps a host library's keys filled in:
//! - Template rendering with a fixed token set (`{auth}`, `{Auth}`, `{year}`,
//!   `{title}`, `{title_lower}`)
//! - Per-item key assignment with "fill missing" and "overwrite" modes
//! - Library-wide backfill with per-item failure isolation
//! - A change listener that keys items as the host adds them
//!
//! Hosts plug in through the [`Record`], [`Library`], [`PreferenceStore`]
//! and [`Notifier`] traits; [`memory`] provides an in-memory host.
//!
//! ```
//! use impress_citekey::{generate_cite_key, CiteKeySettings, Creator, ItemData, TITLE_FIELD};
//!
//! let item = ItemData::regular(1)
//!     .with_creator(Creator::with_last_name("Gibbon"))
//!     .with_field(TITLE_FIELD, "The Rise and Fall of Empires");
//! let settings = CiteKeySettings::new("{Auth}{year}{title}", 2);
//! assert_eq!(generate_cite_key(&item, &settings), "GibbonndRiseFall");
//! ```

pub mod backfill;
pub mod error;
pub mod generator;
pub mod listener;
pub mod memory;
pub mod normalize;
pub mod notifier;
pub mod preview;
pub mod processor;
pub mod record;
pub mod resolvers;
pub mod service;
pub mod settings;
pub mod status;
pub mod template;

pub use backfill::{Backfill, BackfillFailure, BackfillMode, BackfillReport};
pub use error::{CiteKeyError, Result, StoreError};
pub use generator::{generate_cite_key, KeyGenerator};
pub use listener::ChangeListener;
pub use memory::{ItemData, ItemType, MemoryItem, MemoryLibrary, MemoryNotifier, MemoryPreferences};
pub use notifier::{EntityType, Notifier, NotifyEvent, Observer, ObserverId};
pub use preview::{preview_key, PreviewText};
pub use processor::ItemProcessor;
pub use record::{Creator, ItemId, Library, Record, CITATION_KEY_FIELD, DATE_FIELD, TITLE_FIELD};
pub use resolvers::{resolve_author, resolve_title_words, resolve_year, TitleStyle};
pub use service::CiteKeyService;
pub use settings::{
    seed_defaults, CiteKeySettings, PreferenceStore, DEFAULT_TEMPLATE, DEFAULT_TITLE_WORDS,
    PREF_TEMPLATE, PREF_TITLE_WORDS,
};
pub use status::BatchStatus;
pub use template::{render, validate_template, TemplateValidation, Token};
