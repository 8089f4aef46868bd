use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::item::RawRecord;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("remote store unavailable: {0}")]
    Unavailable(String),
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// An event delivered by a live remote query.
#[derive(Debug)]
pub enum RemoteEvent {
    /// Full snapshot of the watched collection, newest first. Always a
    /// complete replacement, never a delta.
    Snapshot(Vec<RawRecord>),
    /// Out-of-band failure of the live query. After this the stream is dead.
    Error(StoreError),
}

/// The external managed real-time document database.
///
/// Records are loosely-typed JSON maps; the facade owns coercion into
/// [`Item`](crate::Item). The remote store assigns record ids and creation
/// timestamps on accept. No wire protocol is implemented here; implementors
/// bridge to whatever provider SDK they use.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Open a live, ordered query over `collection` (newest first).
    ///
    /// The returned channel carries full-snapshot events and, on failure, a
    /// single [`RemoteEvent::Error`]. Dropping the receiver detaches the
    /// query. A closed channel means the remote went away.
    async fn watch(&self, collection: &str) -> Result<mpsc::Receiver<RemoteEvent>, StoreError>;

    /// Append a new record to `collection`, returning the assigned id.
    async fn add(&self, collection: &str, record: RawRecord) -> Result<String, StoreError>;

    /// Apply a partial update to one existing record by id.
    async fn update(&self, collection: &str, id: &str, patch: RawRecord)
        -> Result<(), StoreError>;
}

/// A scoped key-value blob store backing the local fallback registry.
///
/// No transactions, no partial writes; the fallback store serializes its
/// entire item list under one fixed key.
pub trait BlobStore: Send + Sync {
    /// Read the blob under `key`; `Ok(None)` if nothing was ever written.
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Write (replace) the blob under `key`.
    fn write(&self, key: &str, bytes: &[u8]) -> Result<(), StoreError>;
}

/// A remote store that is never reachable.
///
/// Every operation reports [`StoreError::Unavailable`], so a facade built on
/// it serves entirely from the local fallback store. Useful for fully-offline
/// deployments and for exercising failover paths in tests.
#[derive(Debug, Default)]
pub struct OfflineRemote;

#[async_trait]
impl RemoteStore for OfflineRemote {
    async fn watch(&self, collection: &str) -> Result<mpsc::Receiver<RemoteEvent>, StoreError> {
        Err(StoreError::Unavailable(format!(
            "no remote backend configured for collection '{collection}'"
        )))
    }

    async fn add(&self, collection: &str, _record: RawRecord) -> Result<String, StoreError> {
        Err(StoreError::Unavailable(format!(
            "no remote backend configured for collection '{collection}'"
        )))
    }

    async fn update(
        &self,
        collection: &str,
        _id: &str,
        _patch: RawRecord,
    ) -> Result<(), StoreError> {
        Err(StoreError::Unavailable(format!(
            "no remote backend configured for collection '{collection}'"
        )))
    }
}
