// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Local fallback store.
//!
//! When the remote document store is unavailable, the [`LocalStore`] serves
//! the same three operations from an in-process registry persisted as a single
//! JSON blob. It is a substitute backend, not a write-behind buffer: items
//! written here are never replayed to the remote store, and the two registries
//! are never merged.
//!
//! # Durability
//!
//! Persistence is best-effort by design. A corrupt or unreadable blob hydrates
//! as an empty store; a failed write is logged and swallowed, and the
//! in-memory registry still updates and subscribers are still notified.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::item::{now_millis, Item, ItemDraft, ItemStatus};
use crate::metrics;

use super::traits::BlobStore;

/// Full-snapshot change callback. Receives every item, newest first.
pub type ChangeCallback = Arc<dyn Fn(Vec<Item>) + Send + Sync>;

struct Registry {
    items: Vec<Item>,
    hydrated: bool,
}

/// In-process durable item registry with multi-subscriber change notification.
///
/// Construct one per logical store and share it via `Arc`; the registry and
/// subscriber set are owned by the instance, so independent tests get
/// independent stores.
pub struct LocalStore {
    blob: Arc<dyn BlobStore>,
    blob_key: String,
    registry: Mutex<Registry>,
    subscribers: Arc<Mutex<HashMap<u64, ChangeCallback>>>,
    next_subscriber: AtomicU64,
}

/// Handle detaching one subscriber. Idempotent; safe to call from inside a
/// change-notification callback.
pub struct LocalSubscription {
    id: u64,
    subscribers: Arc<Mutex<HashMap<u64, ChangeCallback>>>,
}

impl LocalSubscription {
    pub fn unsubscribe(&self) {
        self.subscribers.lock().remove(&self.id);
    }
}

impl LocalStore {
    pub fn new(blob: Arc<dyn BlobStore>, blob_key: impl Into<String>) -> Self {
        Self {
            blob,
            blob_key: blob_key.into(),
            registry: Mutex::new(Registry {
                items: Vec::new(),
                hydrated: false,
            }),
            subscribers: Arc::new(Mutex::new(HashMap::new())),
            next_subscriber: AtomicU64::new(0),
        }
    }

    /// Register `on_change` and return its unsubscribe handle.
    ///
    /// The current snapshot is delivered asynchronously on a spawned task, not
    /// within this call, so callers can subscribe before wiring their own
    /// state. Must be called from within a tokio runtime.
    pub fn subscribe<F>(&self, on_change: F) -> LocalSubscription
    where
        F: Fn(Vec<Item>) + Send + Sync + 'static,
    {
        self.subscribe_shared(Arc::new(on_change))
    }

    /// [`subscribe`](Self::subscribe) for an already-shared callback.
    pub fn subscribe_shared(&self, on_change: ChangeCallback) -> LocalSubscription {
        self.hydrate_if_needed();

        let id = self.next_subscriber.fetch_add(1, Ordering::Relaxed);
        self.subscribers.lock().insert(id, on_change.clone());

        let snapshot = self.snapshot();
        tokio::spawn(async move {
            on_change(snapshot);
        });

        LocalSubscription {
            id,
            subscribers: Arc::clone(&self.subscribers),
        }
    }

    /// Create a new item: fresh UUID, `Lost` status, local clock timestamp.
    ///
    /// Persists the whole registry, then synchronously notifies every
    /// subscriber with the updated snapshot.
    pub fn add_item(&self, draft: ItemDraft) -> Item {
        self.hydrate_if_needed();

        let item = Item {
            id: Uuid::new_v4().to_string(),
            title: draft.title,
            description: draft.description,
            photo: draft.photo,
            status: ItemStatus::Lost,
            created_at: now_millis(),
        };

        self.registry.lock().items.push(item.clone());
        debug!(id = %item.id, title = %item.title, "item added to local store");
        metrics::record_operation("local", "add", "success");

        self.persist();
        self.notify();
        item
    }

    /// Mark the item with `id` as found. Unknown ids are a silent no-op:
    /// nothing is persisted and no notification goes out. Returns whether a
    /// mutation happened.
    pub fn mark_found(&self, id: &str) -> bool {
        self.hydrate_if_needed();

        let mutated = {
            let mut registry = self.registry.lock();
            match registry.items.iter_mut().find(|item| item.id == id) {
                Some(item) => {
                    item.status = ItemStatus::Found;
                    true
                }
                None => false,
            }
        };

        if mutated {
            debug!(%id, "item marked found in local store");
            metrics::record_operation("local", "mark_found", "success");
            self.persist();
            self.notify();
        } else {
            debug!(%id, "mark_found for unknown id ignored");
        }
        mutated
    }

    /// Current items, newest first.
    ///
    /// Ordering is recomputed on every call. Ties on the millisecond clock
    /// break toward the later insert, so back-to-back adds present newest
    /// first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Item> {
        let registry = self.registry.lock();
        let mut items: Vec<Item> = registry.items.iter().rev().cloned().collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        items
    }

    /// Number of active subscribers (test observability).
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }

    fn hydrate_if_needed(&self) {
        let mut registry = self.registry.lock();
        if registry.hydrated {
            return;
        }
        registry.hydrated = true;

        match self.blob.read(&self.blob_key) {
            Ok(Some(bytes)) => match serde_json::from_slice::<Vec<Item>>(&bytes) {
                Ok(items) => {
                    debug!(count = items.len(), key = %self.blob_key, "local store hydrated");
                    registry.items = items;
                }
                Err(e) => {
                    warn!(error = %e, key = %self.blob_key, "stored item blob is malformed, starting empty");
                }
            },
            Ok(None) => {}
            Err(e) => {
                warn!(error = %e, key = %self.blob_key, "could not read item blob, starting empty");
            }
        }
    }

    /// Serialize and write the whole registry. Failures are logged and
    /// swallowed; the in-memory state is already updated and notification
    /// still proceeds.
    fn persist(&self) {
        let bytes = {
            let registry = self.registry.lock();
            match serde_json::to_vec(&registry.items) {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!(error = %e, "could not serialize item registry, skipping persist");
                    return;
                }
            }
        };

        if let Err(e) = self.blob.write(&self.blob_key, &bytes) {
            warn!(error = %e, key = %self.blob_key, "item registry persist failed, continuing in memory");
            metrics::record_operation("local", "persist", "error");
        }
    }

    fn notify(&self) {
        let snapshot = self.snapshot();
        // Callbacks run outside the subscriber-map lock so a callback may
        // unsubscribe itself without deadlocking.
        let callbacks: Vec<ChangeCallback> = self.subscribers.lock().values().cloned().collect();
        for callback in callbacks {
            callback(snapshot.clone());
        }
    }
}
