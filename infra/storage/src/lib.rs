//! Flat, asynchronous key-value storage.
//!
//! This crate defines the [`KeyValueStore`] contract that the `kvfs` namespace layer drives,
//! together with two backends:
//!
//! - **[`MemoryStore`]**: an ordered in-process map. Ideal for tests and ephemeral data.
//! - **[`DiskStore`]**: one file per key under a sandboxed root, with atomic writes
//!   (unique temp file + `fsync` + `rename`), optional LZ4 compression, directory
//!   sharding and self-healing of abandoned temp files.
//!
//! Keys are opaque strings to every backend. Any notion of directories, prefixes or
//! wildcards belongs to the layer above.
//!
//! # Examples
//!
//! ```rust
//! use kvfs_storage::{KeyValueStore, MemoryStore, StorageError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), StorageError> {
//!     let store = MemoryStore::new();
//!     store.set_many(vec![
//!         ("/a/1".to_owned(), "one".to_owned()),
//!         ("/a/2".to_owned(), "two".to_owned()),
//!     ]).await?;
//!
//!     let values = store.get_many(&["/a/2".to_owned(), "/a/3".to_owned()]).await?;
//!     assert_eq!(values[0].1.as_deref(), Some("two"));
//!     assert_eq!(values[1].1, None);
//!     Ok(())
//! }
//! ```

mod builder;
mod engine;
mod error;
mod layout;
mod maintenance;
mod memory;
mod store;

pub use builder::DiskStoreBuilder;
pub use engine::{Compression, DiskStore};
pub use error::{StorageError, StorageErrorExt};
pub use layout::MAX_KEY_LEN;
pub use memory::MemoryStore;
pub use store::KeyValueStore;
