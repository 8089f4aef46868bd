//! Configuration for the sync layer.
//!
//! # Example
//!
//! ```
//! use lostfound_sync::SyncConfig;
//!
//! // Defaults
//! let config = SyncConfig::default();
//! assert_eq!(config.collection, "items");
//! assert_eq!(config.blob_key, "lost-items");
//!
//! // Overrides
//! let config = SyncConfig {
//!     collection: "lost-and-found".into(),
//!     data_dir: Some("/var/lib/lostfound".into()),
//!     ..Default::default()
//! };
//! ```

use serde::Deserialize;

/// Configuration for [`SyncFacade`](crate::SyncFacade) and the fallback store.
///
/// All fields have defaults; a fully-default config serves an in-memory-only
/// fallback unless `data_dir` is set.
#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    /// Remote collection name the live query and mutations target.
    #[serde(default = "default_collection")]
    pub collection: String,

    /// Fixed key the fallback store persists its item blob under.
    #[serde(default = "default_blob_key")]
    pub blob_key: String,

    /// Directory for the durable blob store. `None` means the embedder wires
    /// its own [`BlobStore`](crate::BlobStore) (or accepts memory-only).
    #[serde(default)]
    pub data_dir: Option<String>,
}

fn default_collection() -> String {
    "items".to_string()
}

fn default_blob_key() -> String {
    "lost-items".to_string()
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            collection: default_collection(),
            blob_key: default_blob_key(),
            data_dir: None,
        }
    }
}
