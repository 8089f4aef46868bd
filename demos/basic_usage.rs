// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Basic lostfound-sync usage example.
//!
//! Demonstrates:
//! 1. Building a facade over a durable local fallback store
//! 2. Subscribing to full-snapshot change notifications
//! 3. Submitting lost-item reports (with and without a photo)
//! 4. Marking an item found
//! 5. Displaying metrics (OTEL-compatible)
//! 6. Clean unsubscribe
//!
//! No remote backend is required: the facade is wired with [`OfflineRemote`],
//! so every call exercises the failover path and serves from the local store.
//!
//! # Run
//!
//! ```bash
//! cargo run --example basic_usage
//! ```

use std::sync::Arc;
use std::time::Duration;

use lostfound_sync::{
    FileBlobStore, ItemDraft, LocalStore, OfflineRemote, SyncConfig, SyncFacade,
};
use metrics_util::debugging::{DebuggingRecorder, Snapshotter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Install metrics recorder (captures all metrics for OTEL export)
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    recorder.install().expect("failed to install metrics recorder");

    // Simple logging (no filter for simplicity)
    tracing_subscriber::fmt()
        .with_target(false)
        .compact()
        .init();

    println!("\n╔═══════════════════════════════════════════════════════════════╗");
    println!("║           lostfound-sync: Basic Usage Example                 ║");
    println!("╚═══════════════════════════════════════════════════════════════╝\n");

    // ─────────────────────────────────────────────────────────────────────────
    // 1. Build the facade over a durable local store
    // ─────────────────────────────────────────────────────────────────────────
    println!("📦 Configuring lostfound-sync...");

    let config = SyncConfig {
        data_dir: Some("./demo_data".into()),
        ..Default::default()
    };
    let blob = FileBlobStore::new(config.data_dir.as_deref().unwrap())?;
    let local = Arc::new(LocalStore::new(Arc::new(blob), config.blob_key.clone()));
    let facade = SyncFacade::new(config, Arc::new(OfflineRemote), local);

    // ─────────────────────────────────────────────────────────────────────────
    // 2. Subscribe: every change delivers the full newest-first snapshot
    // ─────────────────────────────────────────────────────────────────────────
    println!("👂 Subscribing to item snapshots...\n");

    let subscription = facade
        .subscribe(|items| {
            println!("  snapshot ({} items):", items.len());
            for item in &items {
                let photo = item.photo.as_deref().unwrap_or("no photo");
                println!(
                    "    [{}] {} — {} ({})",
                    item.status.as_str(),
                    item.title,
                    item.description,
                    photo
                );
            }
        })
        .await;

    // ─────────────────────────────────────────────────────────────────────────
    // 3. Submit two reports
    // ─────────────────────────────────────────────────────────────────────────
    println!("📝 Submitting lost-item reports...");

    facade
        .submit_item(ItemDraft {
            title: "Blue Backpack".into(),
            description: "Left in library".into(),
            photo: Some("https://example.edu/photos/backpack.jpg".into()),
        })
        .await;
    facade
        .submit_item(ItemDraft {
            title: "Red Umbrella".into(),
            description: "Near gym".into(),
            photo: None,
        })
        .await;

    // ─────────────────────────────────────────────────────────────────────────
    // 4. Mark the backpack found
    // ─────────────────────────────────────────────────────────────────────────
    println!("✅ Marking the backpack found...");

    let backpack_id = facade_snapshot_id(&facade).await;
    facade.mark_found(&backpack_id).await;

    // Let the spawned initial-snapshot delivery settle before exiting.
    tokio::time::sleep(Duration::from_millis(50)).await;

    // ─────────────────────────────────────────────────────────────────────────
    // 5. Metrics snapshot
    // ─────────────────────────────────────────────────────────────────────────
    print_metrics(&snapshotter);

    // ─────────────────────────────────────────────────────────────────────────
    // 6. Unsubscribe (idempotent)
    // ─────────────────────────────────────────────────────────────────────────
    subscription.unsubscribe();
    subscription.unsubscribe();
    println!("\n👋 Done.");

    Ok(())
}

/// Fish the Blue Backpack's id back out via a one-shot subscription.
async fn facade_snapshot_id(facade: &SyncFacade) -> String {
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let sub = facade
        .subscribe(move |items| {
            if let Some(item) = items.iter().find(|i| i.title == "Blue Backpack") {
                let _ = tx.send(item.id.clone());
            }
        })
        .await;
    let id = rx.recv().await.expect("backpack not found in snapshot");
    sub.unsubscribe();
    id
}

fn print_metrics(snapshotter: &Snapshotter) {
    println!("\n📊 Metrics:");
    for (key, _, _, value) in snapshotter.snapshot().into_vec() {
        println!("  {} = {:?}", key.key(), value);
    }
}
