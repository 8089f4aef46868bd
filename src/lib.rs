//! # lostfound-sync
//!
//! Dual-backend real-time sync layer for a campus lost-and-found board.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       UI / render layer                     │
//! │  • subscribe(on_change) / submit_item / mark_found          │
//! │  • treats every snapshot as a full replacement              │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        SyncFacade                           │
//! │  • remote-first, per-call failover                          │
//! │  • decodes loosely-typed remote records into Items          │
//! │  • never surfaces backend availability errors               │
//! └─────────────────────────────────────────────────────────────┘
//!                    │                        │
//!           (live query OK)           (remote unavailable)
//!                    ▼                        ▼
//! ┌──────────────────────────┐  ┌──────────────────────────────┐
//! │   Remote document store  │  │        LocalStore            │
//! │  • external provider     │  │  • in-process registry       │
//! │  • assigns id/createdAt  │  │  • persisted as one blob     │
//! │  • full-snapshot events  │  │  • best-effort durability    │
//! └──────────────────────────┘  └──────────────────────────────┘
//! ```
//!
//! The two registries are never merged or reconciled; exactly one backend
//! serves a given subscription at any moment, and snapshots are always the
//! full item list, newest first.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use lostfound_sync::{
//!     FileBlobStore, ItemDraft, LocalStore, OfflineRemote, SyncConfig, SyncFacade,
//! };
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = SyncConfig {
//!         data_dir: Some("./data".into()),
//!         ..Default::default()
//!     };
//!
//!     let blob = FileBlobStore::new(config.data_dir.as_deref().unwrap()).expect("data dir");
//!     let local = Arc::new(LocalStore::new(Arc::new(blob), config.blob_key.clone()));
//!
//!     // Swap OfflineRemote for a RemoteStore impl bridging your provider SDK.
//!     let facade = SyncFacade::new(config, Arc::new(OfflineRemote), local);
//!
//!     let subscription = facade
//!         .subscribe(|items| {
//!             for item in &items {
//!                 println!("[{}] {}", item.status.as_str(), item.title);
//!             }
//!         })
//!         .await;
//!
//!     facade
//!         .submit_item(ItemDraft {
//!             title: "Blue Backpack".into(),
//!             description: "Left in library".into(),
//!             photo: None,
//!         })
//!         .await;
//!
//!     subscription.unsubscribe();
//! }
//! ```
//!
//! ## Modules
//!
//! - [`facade`]: the [`SyncFacade`] unifying both backends behind one API
//! - [`storage`]: collaborator traits, blob stores, and the [`LocalStore`]
//! - [`item`]: the [`Item`] entity and record decoding
//! - [`config`]: [`SyncConfig`]

pub mod config;
pub mod facade;
pub mod item;
pub mod metrics;
pub mod storage;

pub use config::SyncConfig;
pub use facade::{Subscription, SyncFacade};
pub use item::{DecodeError, Item, ItemDraft, ItemStatus, RawRecord};
pub use storage::{
    BlobStore, FileBlobStore, LocalStore, LocalSubscription, MemoryBlobStore, OfflineRemote,
    RemoteEvent, RemoteStore, StoreError,
};
