//! A hierarchical, glob-addressable namespace over flat asynchronous key-value stores.
//!
//! [`Kvfs`] presents a store as a tiny filesystem: values live at string paths, every
//! path is silently placed under a fixed namespace prefix, and listing or bulk operations
//! select paths with wildcard specs.
//!
//! ## Paths and Prefixes
//!
//! The store key of a path is the plain concatenation `prefix + path`. No separator is
//! inserted and none is required; `/` inside paths is a naming convention only. Listing
//! returns paths with the prefix stripped, so the prefix is invisible to callers.
//!
//! ## Wildcards
//!
//! `*` matches any run of characters and `\` escapes the next character. A spec is
//! anchored at both ends unless it finishes with an unescaped `*`:
//!
//! ```text
//! /foo*     -> /foo, /foo12, /foo/bar
//! /*ball    -> /ball, /baseball        (not /baller)
//! /*ball*   -> /ball, /baseball, /baller
//! /a\*      -> /a*                     (a literal asterisk)
//! ```
//!
//! ## Values
//!
//! Values pass through a [`Codec`]. The default [`JsonCodec`] stores any
//! [`serde_json::Value`]; [`TypedJsonCodec`] binds the instance to one serde type.
//!
//! ## Examples
//!
//! ```rust
//! use kvfs::prelude::*;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), KvfsError> {
//!     let fs = Kvfs::new(MemoryStore::new(), "/kvfs")?;
//!
//!     fs.write("/users/ada", &json!({ "admin": true })).await?;
//!     fs.write("/users/alan", &json!({ "admin": false })).await?;
//!
//!     assert_eq!(fs.list(Some("/users/*")).await?, ["/users/ada", "/users/alan"]);
//!     assert_eq!(fs.read("/users/ada").await?, Some(json!({ "admin": true })));
//!
//!     assert_eq!(fs.remove_matching("/users/a*").await?, 2);
//!     assert!(fs.list(None).await?.is_empty());
//!     Ok(())
//! }
//! ```

mod builder;
pub mod codec;
mod error;
mod fs;
mod namespace;
pub mod pattern;

pub use builder::{KvfsBuilder, NoStore, WithStore};
pub use codec::{Codec, JsonCodec, TypedJsonCodec};
pub use error::{KvfsError, KvfsErrorExt};
pub use fs::{Entry, Kvfs, PathValue};
pub use namespace::Namespace;
pub use pattern::Pattern;

pub use kvfs_storage::{
    Compression, DiskStore, DiskStoreBuilder, KeyValueStore, MemoryStore, StorageError,
};

pub mod prelude {
    pub use crate::codec::{Codec, JsonCodec, TypedJsonCodec};
    pub use crate::error::{KvfsError, KvfsErrorExt};
    pub use crate::fs::{Entry, Kvfs, PathValue};
    pub use kvfs_storage::{Compression, DiskStore, KeyValueStore, MemoryStore};
}
