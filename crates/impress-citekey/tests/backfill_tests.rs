//! Library backfill integration tests

mod common;

use std::sync::Arc;

use impress_citekey::{
    Backfill, BackfillMode, MemoryLibrary, MemoryPreferences, PreferenceStore, Record,
    CITATION_KEY_FIELD, PREF_TEMPLATE,
};

use common::{processor, ten_papers};

fn backfill_for(library: &MemoryLibrary, prefs: Arc<MemoryPreferences>) -> Backfill<MemoryLibrary> {
    Backfill::new(Arc::new(library.clone()), processor(prefs))
}

fn keys(library: &MemoryLibrary) -> Vec<Option<String>> {
    library
        .items()
        .iter()
        .map(|i| i.field(CITATION_KEY_FIELD))
        .collect()
}

#[tokio::test]
async fn test_fill_missing_then_overwrite_all() {
    let library = MemoryLibrary::from_items(ten_papers());
    let backfill = backfill_for(&library, Arc::new(MemoryPreferences::new()));

    assert_eq!(backfill.run(false).await.unwrap(), 6);

    let after_fill = keys(&library);
    for (i, key) in after_fill.iter().enumerate() {
        if i % 2 == 1 && i < 8 {
            assert_eq!(key.as_deref(), Some(format!("existing{}", i).as_str()));
        } else {
            assert!(key.is_some());
        }
    }
    assert_eq!(after_fill[0].as_deref(), Some("shannon1940"));

    assert_eq!(backfill.run(true).await.unwrap(), 10);
    assert_eq!(keys(&library)[1].as_deref(), Some("turing1941"));
}

#[tokio::test]
async fn test_fill_missing_is_idempotent() {
    let library = MemoryLibrary::from_items(ten_papers());
    let backfill = backfill_for(&library, Arc::new(MemoryPreferences::new()));

    assert_eq!(backfill.run(false).await.unwrap(), 6);
    let saves = library.save_count();

    assert_eq!(backfill.run(false).await.unwrap(), 0);
    assert_eq!(library.save_count(), saves);
}

#[tokio::test]
async fn test_template_change_applies_to_next_run() {
    let library = MemoryLibrary::from_items(ten_papers());
    let prefs = Arc::new(MemoryPreferences::new());
    let backfill = backfill_for(&library, prefs.clone());

    prefs.set(PREF_TEMPLATE, "{Auth}_{title_lower}".into());
    backfill.run(true).await.unwrap();

    assert_eq!(keys(&library)[2].as_deref(), Some("Hopper_computable_numbers"));
}

#[tokio::test]
async fn test_empty_keys_are_never_saved() {
    let mut untitled = ten_papers();
    for item in &mut untitled {
        item.fields.remove("title");
    }
    let library = MemoryLibrary::from_items(untitled);
    let before = library.items();

    let prefs = Arc::new(MemoryPreferences::new());
    prefs.set(PREF_TEMPLATE, "{title}".into());
    let report = backfill_for(&library, prefs)
        .run_with_report(BackfillMode::Overwrite)
        .await
        .unwrap();

    assert_eq!(report.changed, 0);
    assert_eq!(report.skipped, 10);
    assert_eq!(library.save_count(), 0);
    assert_eq!(library.items(), before);
}

#[tokio::test]
async fn test_rejected_saves_are_reported_not_fatal() {
    let library = MemoryLibrary::from_items(ten_papers());
    library.reject_saves_for(1);
    library.reject_saves_for(10);

    let report = backfill_for(&library, Arc::new(MemoryPreferences::new()))
        .run_with_report(BackfillMode::Overwrite)
        .await
        .unwrap();

    assert_eq!(report.total, 10);
    assert_eq!(report.changed, 8);
    let failed: Vec<i64> = report.failed.iter().map(|f| f.item).collect();
    assert_eq!(failed, vec![1, 10]);
}
