// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Synchronization facade.
//!
//! The [`SyncFacade`] presents one backend-agnostic contract to the UI:
//! `subscribe`, `submit_item`, `mark_found`. Each operation tries the remote
//! store first and transparently falls back to the [`LocalStore`] on failure;
//! backend availability problems never surface to the caller.
//!
//! # Failover is per call
//!
//! Each of the three operations independently decides remote-vs-fallback from
//! its own success or failure. There is no sticky "fallback mode" flag: a
//! `submit_item` after a failed `subscribe` still tries the remote path. This
//! mirrors the behavior the UI was built against; a sticky variant would keep
//! one backend authoritative for the whole session but would also stop
//! mutations from reaching a recovered remote.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use lostfound_sync::{
//!     ItemDraft, LocalStore, MemoryBlobStore, OfflineRemote, SyncConfig, SyncFacade,
//! };
//!
//! # #[tokio::main]
//! # async fn main() {
//! let config = SyncConfig::default();
//! let local = Arc::new(LocalStore::new(
//!     Arc::new(MemoryBlobStore::new()),
//!     config.blob_key.clone(),
//! ));
//! let facade = SyncFacade::new(config, Arc::new(OfflineRemote), local);
//!
//! let subscription = facade
//!     .subscribe(|items| println!("{} items", items.len()))
//!     .await;
//!
//! facade
//!     .submit_item(ItemDraft {
//!         title: "Blue Backpack".into(),
//!         description: "Left in library".into(),
//!         photo: None,
//!     })
//!     .await;
//!
//! subscription.unsubscribe();
//! # }
//! ```

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::config::SyncConfig;
use crate::item::{Item, ItemDraft, RawRecord};
use crate::metrics;
use crate::storage::local::{ChangeCallback, LocalStore, LocalSubscription};
use crate::storage::traits::{RemoteEvent, RemoteStore};

/// Which backend is currently serving a subscription.
enum ActiveBackend {
    /// Remote watch requested, pump task handle not yet installed.
    Pending,
    /// Live remote query, served by the pump task.
    Remote(JoinHandle<()>),
    /// Failed over to the local store.
    Local(LocalSubscription),
    /// Unsubscribed.
    Detached,
}

/// Handle for one `subscribe` call.
///
/// [`unsubscribe`](Subscription::unsubscribe) detaches from whichever backend
/// is active at that moment, including a backend the subscription failed over
/// to after it was created. Idempotent.
pub struct Subscription {
    active: Arc<Mutex<ActiveBackend>>,
}

impl Subscription {
    pub fn unsubscribe(&self) {
        let previous = std::mem::replace(&mut *self.active.lock(), ActiveBackend::Detached);
        match previous {
            ActiveBackend::Remote(pump) => pump.abort(),
            ActiveBackend::Local(sub) => sub.unsubscribe(),
            ActiveBackend::Pending | ActiveBackend::Detached => {}
        }
    }
}

/// The dual-backend synchronization layer.
///
/// Owns no item state itself; the remote store and the injected [`LocalStore`]
/// each own their registry, and the facade only chooses which one serves a
/// given call.
pub struct SyncFacade {
    config: SyncConfig,
    remote: Arc<dyn RemoteStore>,
    local: Arc<LocalStore>,
}

impl SyncFacade {
    pub fn new(config: SyncConfig, remote: Arc<dyn RemoteStore>, local: Arc<LocalStore>) -> Self {
        Self {
            config,
            remote,
            local,
        }
    }

    /// Open a live subscription; `on_change` receives the full newest-first
    /// snapshot on every change from whichever backend is active.
    ///
    /// Remote failure, whether synchronous at setup or an asynchronous error
    /// on the live query, fails over to the local store with the same
    /// callback. Never surfaces an error.
    pub async fn subscribe<F>(&self, on_change: F) -> Subscription
    where
        F: Fn(Vec<Item>) + Send + Sync + 'static,
    {
        let callback: ChangeCallback = Arc::new(on_change);

        match self.remote.watch(&self.config.collection).await {
            Ok(events) => {
                debug!(collection = %self.config.collection, "live remote query opened");
                metrics::record_operation("remote", "subscribe", "success");

                let active = Arc::new(Mutex::new(ActiveBackend::Pending));
                let pump = tokio::spawn(pump_remote_events(
                    events,
                    callback,
                    Arc::clone(&self.local),
                    Arc::clone(&active),
                ));

                let mut slot = active.lock();
                if matches!(*slot, ActiveBackend::Pending) {
                    *slot = ActiveBackend::Remote(pump);
                } else {
                    // The pump already failed over (or the slot was detached)
                    // before we got here; it has run to completion.
                    pump.abort();
                }
                drop(slot);

                Subscription { active }
            }
            Err(e) => {
                warn!(error = %e, "remote subscribe failed, serving from local store");
                metrics::record_failover("subscribe");

                let sub = self.local.subscribe_shared(callback);
                Subscription {
                    active: Arc::new(Mutex::new(ActiveBackend::Local(sub))),
                }
            }
        }
    }

    /// Create a new lost-item report.
    ///
    /// The accepting backend assigns the id and creation timestamp. On remote
    /// failure the item is written through the local store instead; by the
    /// time this returns, one backend has recorded the item and notified its
    /// subscribers.
    pub async fn submit_item(&self, draft: ItemDraft) {
        let record = draft.to_record();
        match self.remote.add(&self.config.collection, record).await {
            Ok(id) => {
                debug!(%id, "item accepted by remote store");
                metrics::record_operation("remote", "add", "success");
            }
            Err(e) => {
                warn!(error = %e, "remote add failed, writing to local store");
                metrics::record_failover("submit_item");
                self.local.add_item(draft);
            }
        }
    }

    /// Mark an item as found.
    ///
    /// Unknown ids in the active backend are a silent no-op, matching the
    /// contract the UI expects.
    pub async fn mark_found(&self, id: &str) {
        let mut patch = RawRecord::new();
        patch.insert("status".into(), serde_json::Value::String("found".into()));

        match self.remote.update(&self.config.collection, id, patch).await {
            Ok(()) => {
                debug!(%id, "item marked found in remote store");
                metrics::record_operation("remote", "mark_found", "success");
            }
            Err(e) => {
                warn!(error = %e, %id, "remote update failed, updating local store");
                metrics::record_failover("mark_found");
                self.local.mark_found(id);
            }
        }
    }
}

/// Forward remote snapshots to the callback; on an error event or a closed
/// stream, re-subscribe the same callback through the local store.
async fn pump_remote_events(
    mut events: mpsc::Receiver<RemoteEvent>,
    callback: ChangeCallback,
    local: Arc<LocalStore>,
    active: Arc<Mutex<ActiveBackend>>,
) {
    loop {
        match events.recv().await {
            Some(RemoteEvent::Snapshot(records)) => {
                callback(decode_snapshot(records));
            }
            Some(RemoteEvent::Error(e)) => {
                warn!(error = %e, "live remote query failed, switching to local store");
                fail_over(&callback, &local, &active);
                return;
            }
            None => {
                warn!("live remote query closed, switching to local store");
                fail_over(&callback, &local, &active);
                return;
            }
        }
    }
}

fn fail_over(callback: &ChangeCallback, local: &Arc<LocalStore>, active: &Arc<Mutex<ActiveBackend>>) {
    metrics::record_failover("subscribe");
    let mut slot = active.lock();
    if matches!(*slot, ActiveBackend::Detached) {
        // Unsubscribed while the error was in flight; do not attach a
        // listener nobody can remove.
        return;
    }
    *slot = ActiveBackend::Local(local.subscribe_shared(Arc::clone(callback)));
}

/// Decode a raw remote snapshot, skipping records that fail to decode, and
/// re-sort newest first regardless of the order the remote delivered.
fn decode_snapshot(records: Vec<RawRecord>) -> Vec<Item> {
    let mut items: Vec<Item> = records
        .iter()
        .filter_map(|record| match Item::decode(record) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!(error = %e, "skipping undecodable remote record");
                None
            }
        })
        .collect();
    items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    items
}
