//! Property-based tests for the sync layer.
//!
//! Uses proptest to throw random and malformed inputs at the record decoder
//! and the fallback store, verifying the invariants hold for all of them:
//! decode never panics, snapshots are always newest-first, and `mark_found`
//! touches exactly its target.
//!
//! Run with: `cargo test --test proptest_fuzz`

use std::sync::Arc;

use proptest::prelude::*;
use serde_json::{json, Value};

use lostfound_sync::{Item, ItemDraft, ItemStatus, LocalStore, MemoryBlobStore, RawRecord};

// =============================================================================
// Strategies
// =============================================================================

/// Arbitrary JSON values, including nested structures a buggy remote client
/// might write into a record field.
fn arbitrary_json_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| Value::Number(n.into())),
        ".*".prop_map(Value::String),
    ];

    leaf.prop_recursive(3, 32, 8, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..8).prop_map(Value::Array),
            prop::collection::hash_map("[a-zA-Z]{1,12}", inner, 0..8)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

/// Arbitrary raw records: random field names mapped to arbitrary values,
/// sometimes overlapping the real schema.
fn arbitrary_record_strategy() -> impl Strategy<Value = RawRecord> {
    prop::collection::hash_map(
        prop_oneof![
            Just("id".to_string()),
            Just("title".to_string()),
            Just("description".to_string()),
            Just("photo".to_string()),
            Just("status".to_string()),
            Just("createdAt".to_string()),
            "[a-zA-Z]{1,12}",
        ],
        arbitrary_json_strategy(),
        0..10,
    )
    .prop_map(|m| m.into_iter().collect())
}

fn draft_strategy() -> impl Strategy<Value = ItemDraft> {
    (
        "[a-zA-Z0-9 ]{1,24}",
        "[a-zA-Z0-9 ]{1,48}",
        prop::option::of("https://[a-z]{1,10}\\.edu/[a-z0-9]{1,8}"),
    )
        .prop_map(|(title, description, photo)| ItemDraft {
            title,
            description,
            photo,
        })
}

fn store() -> LocalStore {
    LocalStore::new(Arc::new(MemoryBlobStore::new()), "lost-items")
}

// =============================================================================
// Decode properties
// =============================================================================

proptest! {
    /// Decoding any raw record returns Ok or a clean error, never panics.
    #[test]
    fn decode_never_panics(record in arbitrary_record_strategy()) {
        let _ = Item::decode(&record);
    }

    /// A well-formed record decodes regardless of what extra junk fields the
    /// remote client attached.
    #[test]
    fn decode_tolerates_extra_fields(extra in arbitrary_record_strategy()) {
        let mut record: RawRecord = json!({
            "id": "item-1",
            "title": "Keys",
            "description": "Three keys",
            "photo": "https://example.edu/p/1.jpg",
            "status": "lost",
            "createdAt": 1_724_500_000_000i64,
        })
        .as_object()
        .unwrap()
        .clone();
        for (k, v) in extra {
            record.entry(k).or_insert(v);
        }

        let item = Item::decode(&record).unwrap();
        prop_assert_eq!(item.id, "item-1");
        prop_assert_eq!(item.status, ItemStatus::Lost);
    }
}

// =============================================================================
// Fallback store properties
// =============================================================================

proptest! {
    /// Every add sequence yields a snapshot with exactly those items, all
    /// Lost, ordered newest-first.
    #[test]
    fn add_sequences_snapshot_newest_first(drafts in prop::collection::vec(draft_strategy(), 0..12)) {
        let store = store();
        let ids: Vec<String> = drafts
            .iter()
            .map(|d| store.add_item(d.clone()).id)
            .collect();

        let snapshot = store.snapshot();
        prop_assert_eq!(snapshot.len(), drafts.len());
        prop_assert!(snapshot.iter().all(|i| i.status == ItemStatus::Lost));
        prop_assert!(snapshot
            .windows(2)
            .all(|w| w[0].created_at >= w[1].created_at));
        for id in &ids {
            prop_assert!(snapshot.iter().any(|i| &i.id == id));
        }
    }

    /// Marking a subset found flips exactly that subset and nothing else.
    #[test]
    fn mark_found_touches_only_targets(
        drafts in prop::collection::vec(draft_strategy(), 1..10),
        selector in prop::collection::vec(any::<bool>(), 10),
    ) {
        let store = store();
        let ids: Vec<String> = drafts
            .iter()
            .map(|d| store.add_item(d.clone()).id)
            .collect();

        let targets: Vec<&String> = ids
            .iter()
            .zip(selector.iter())
            .filter(|(_, &pick)| pick)
            .map(|(id, _)| id)
            .collect();
        for id in &targets {
            prop_assert!(store.mark_found(id));
        }

        let snapshot = store.snapshot();
        for item in &snapshot {
            let expected = if targets.iter().any(|t| **t == item.id) {
                ItemStatus::Found
            } else {
                ItemStatus::Lost
            };
            prop_assert_eq!(item.status, expected);
        }
    }

    /// Unknown-id mark_found mutates nothing, for any registry contents.
    #[test]
    fn mark_found_unknown_id_changes_nothing(drafts in prop::collection::vec(draft_strategy(), 0..8)) {
        let store = store();
        for d in &drafts {
            store.add_item(d.clone());
        }
        let before = store.snapshot();

        prop_assert!(!store.mark_found("not-a-real-id"));

        prop_assert_eq!(store.snapshot(), before);
    }

    /// Persist + rehydrate round-trips the registry exactly.
    #[test]
    fn restart_round_trip_is_exact(drafts in prop::collection::vec(draft_strategy(), 0..10)) {
        let blob = Arc::new(MemoryBlobStore::new());

        let first = LocalStore::new(blob.clone(), "lost-items");
        for d in &drafts {
            first.add_item(d.clone());
        }
        let before = first.snapshot();

        let second = LocalStore::new(blob, "lost-items");
        prop_assert_eq!(second.snapshot(), before);
    }
}
