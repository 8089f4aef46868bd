//! Storage backends: collaborator traits, blob stores, and the local
//! fallback store.

pub mod blob;
pub mod local;
pub mod traits;

pub use blob::{FileBlobStore, MemoryBlobStore};
pub use local::{LocalStore, LocalSubscription};
pub use traits::{BlobStore, OfflineRemote, RemoteEvent, RemoteStore, StoreError};
