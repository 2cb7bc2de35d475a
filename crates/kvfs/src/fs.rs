//! The path-based facade over a flat key-value store.

use crate::builder::{KvfsBuilder, NoStore};
use crate::codec::{Codec, JsonCodec};
use crate::error::KvfsError;
use crate::namespace::Namespace;
use kvfs_storage::KeyValueStore;
use serde::Serialize;
use tracing::{debug, info};

/// A path and its decoded value, as returned by [`Kvfs::read_multi`].
///
/// `value` is `None` when the key vanished between listing and fetching.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathValue<V> {
    pub path: String,
    pub value: Option<V>,
}

/// One value to store with [`Kvfs::write_multi`].
#[derive(Debug, Clone, PartialEq)]
pub struct Entry<V> {
    pub path: String,
    pub value: V,
}

impl<V> Entry<V> {
    pub fn new(path: impl Into<String>, value: V) -> Self {
        Self { path: path.into(), value }
    }
}

/// A miniature filesystem over a key-value store.
///
/// Paths are plain strings relative to the instance's [`Namespace`] prefix; the store
/// sees `prefix + path`. Listing and bulk operations take wildcard specs (see
/// [`pattern`](crate::pattern)). Values go through the configured [`Codec`].
///
/// Point operations (`read`, `write`, `remove`) reject empty paths with
/// [`KvfsError::Validation`] before the store is touched. Listing accepts an empty
/// spec as "everything"; destructive bulk removal does not.
///
/// The instance holds no state besides its prefix, store and codec. Concurrent calls
/// are not coordinated; consistency is whatever the store provides.
#[derive(Debug, Clone)]
pub struct Kvfs<S, C = JsonCodec> {
    store: S,
    codec: C,
    namespace: Namespace,
}

impl Kvfs<NoStore> {
    #[must_use = "The instance is not created until you call .build()"]
    pub fn builder() -> KvfsBuilder {
        KvfsBuilder::new()
    }
}

impl<S: KeyValueStore> Kvfs<S, JsonCodec> {
    /// Creates a JSON-backed instance.
    ///
    /// # Errors
    ///
    /// Returns [`KvfsError::Configuration`] if `prefix` is empty.
    pub fn new(store: S, prefix: impl Into<String>) -> Result<Self, KvfsError> {
        Ok(Self::from_parts(store, JsonCodec, Namespace::new(prefix)?))
    }
}

impl<S: KeyValueStore, C: Codec> Kvfs<S, C> {
    pub(crate) const fn from_parts(store: S, codec: C, namespace: Namespace) -> Self {
        Self { store, codec, namespace }
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        self.namespace.prefix()
    }

    #[must_use]
    pub const fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub const fn codec(&self) -> &C {
        &self.codec
    }

    /// Lists the paths matching `spec`. `None` and `""` both match every path.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn list(&self, spec: Option<&str>) -> Result<Vec<String>, KvfsError> {
        let keys = self.matching_keys(spec.unwrap_or_default()).await?;
        Ok(keys.iter().map(|k| self.namespace.from_key(k).to_owned()).collect())
    }

    /// Reads and decodes the value at `path`, or `None` if nothing is stored there.
    ///
    /// # Errors
    ///
    /// * [`KvfsError::Validation`] if `path` is empty.
    /// * [`KvfsError::Store`] / [`KvfsError::Codec`] from the collaborators.
    pub async fn read(&self, path: &str) -> Result<Option<C::Value>, KvfsError> {
        require_path(path, "read")?;
        let key = self.namespace.to_key(path);

        let text = self.store.get(&key).await?;
        debug!(key, found = text.is_some(), "Read path");
        text.map(|t| self.decode(path, &t)).transpose()
    }

    /// Reads every path matching `spec` with one batched fetch.
    ///
    /// # Errors
    ///
    /// Propagates store and codec failures.
    pub async fn read_multi(&self, spec: &str) -> Result<Vec<PathValue<C::Value>>, KvfsError> {
        let keys = self.matching_keys(spec).await?;
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let fetched = self.store.get_many(&keys).await?;
        fetched
            .into_iter()
            .map(|(key, text)| {
                let path = self.namespace.from_key(&key).to_owned();
                let value = text.map(|t| self.decode(&path, &t)).transpose()?;
                Ok(PathValue { path, value })
            })
            .collect()
    }

    /// Encodes and stores `value` at `path`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// * [`KvfsError::Validation`] if `path` is empty.
    /// * [`KvfsError::Store`] / [`KvfsError::Codec`] from the collaborators.
    pub async fn write(&self, path: &str, value: &C::Value) -> Result<(), KvfsError> {
        require_path(path, "write")?;
        let text = self.encode(path, value)?;
        let key = self.namespace.to_key(path);

        self.store.set(&key, text).await?;
        debug!(key, "Wrote path");
        Ok(())
    }

    /// Stores all `entries` with one batched call. Each entry lands at
    /// `base + entry.path` (or `entry.path` alone when `base` is `None`).
    ///
    /// An empty `entries` slice is a no-op that never reaches the store.
    ///
    /// # Errors
    ///
    /// * [`KvfsError::Validation`] if any combined path is empty; nothing is written.
    /// * [`KvfsError::Store`] / [`KvfsError::Codec`] from the collaborators.
    pub async fn write_multi(
        &self,
        base: Option<&str>,
        entries: &[Entry<C::Value>],
    ) -> Result<(), KvfsError> {
        if entries.is_empty() {
            return Ok(());
        }
        let base = base.unwrap_or_default();

        let mut batch = Vec::with_capacity(entries.len());
        for entry in entries {
            let path = format!("{base}{}", entry.path);
            require_path(&path, "write_multi")?;
            let text = self.encode(&path, &entry.value)?;
            batch.push((self.namespace.to_key(&path), text));
        }

        let count = batch.len();
        self.store.set_many(batch).await?;
        debug!(prefix = self.prefix(), count, "Wrote paths in batch");
        Ok(())
    }

    /// Removes the single entry at the literal `path`. Wildcards are not expanded; use
    /// [`remove_matching`](Self::remove_matching) for that. Removing an absent path
    /// succeeds.
    ///
    /// # Errors
    ///
    /// * [`KvfsError::Validation`] if `path` is empty.
    /// * [`KvfsError::Store`] from the store.
    pub async fn remove(&self, path: &str) -> Result<(), KvfsError> {
        require_path(path, "remove")?;
        let key = self.namespace.to_key(path);

        self.store.remove(&key).await?;
        debug!(key, "Removed path");
        Ok(())
    }

    /// Removes every path matching `spec` and returns how many were removed.
    ///
    /// Unlike [`list`](Self::list), an empty spec is refused: removing everything
    /// must be asked for explicitly with `"*"`.
    ///
    /// # Errors
    ///
    /// * [`KvfsError::Validation`] if `spec` is empty.
    /// * [`KvfsError::Store`] from the store.
    pub async fn remove_matching(&self, spec: &str) -> Result<usize, KvfsError> {
        if spec.is_empty() {
            return Err(KvfsError::Validation {
                message: "spec cannot be empty; use \"*\" to remove every path".into(),
                context: Some("remove_matching".into()),
            });
        }

        let keys = self.matching_keys(spec).await?;
        if keys.is_empty() {
            return Ok(0);
        }

        self.store.remove_many(&keys).await?;
        debug!(prefix = self.prefix(), spec, count = keys.len(), "Removed matching paths");
        Ok(keys.len())
    }

    /// Removes the given literal paths with one batched call. An empty slice is a
    /// no-op that never reaches the store.
    ///
    /// # Errors
    ///
    /// * [`KvfsError::Validation`] if any path is empty; nothing is removed.
    /// * [`KvfsError::Store`] from the store.
    pub async fn remove_multi<P: AsRef<str>>(&self, paths: &[P]) -> Result<(), KvfsError> {
        if paths.is_empty() {
            return Ok(());
        }

        let mut keys = Vec::with_capacity(paths.len());
        for path in paths {
            let path = path.as_ref();
            require_path(path, "remove_multi")?;
            keys.push(self.namespace.to_key(path));
        }

        self.store.remove_many(&keys).await?;
        debug!(prefix = self.prefix(), count = keys.len(), "Removed paths in batch");
        Ok(())
    }

    /// Removes every key owned by this instance's namespace and returns how many
    /// were removed. Keys outside the namespace are never touched.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn remove_all_force(&self) -> Result<usize, KvfsError> {
        let keys: Vec<String> =
            self.store.all_keys().await?.into_iter().filter(|k| self.namespace.owns(k)).collect();
        if keys.is_empty() {
            return Ok(0);
        }

        self.store.remove_many(&keys).await?;
        info!(prefix = self.prefix(), count = keys.len(), "Purged namespace");
        Ok(keys.len())
    }

    async fn matching_keys(&self, spec: &str) -> Result<Vec<String>, KvfsError> {
        let pattern = self.namespace.pattern(spec)?;
        let keys: Vec<String> =
            self.store.all_keys().await?.into_iter().filter(|k| pattern.is_match(k)).collect();

        debug!(pattern = pattern.as_str(), matched = keys.len(), "Matched keys");
        Ok(keys)
    }

    fn encode(&self, path: &str, value: &C::Value) -> Result<String, KvfsError> {
        self.codec.encode(value).map_err(|e| KvfsError::Codec {
            source: Box::new(e),
            context: Some(format!("Encoding {path}").into()),
        })
    }

    fn decode(&self, path: &str, text: &str) -> Result<C::Value, KvfsError> {
        self.codec.decode(text).map_err(|e| KvfsError::Codec {
            source: Box::new(e),
            context: Some(format!("Decoding {path}").into()),
        })
    }
}

fn require_path(path: &str, operation: &'static str) -> Result<(), KvfsError> {
    if path.is_empty() {
        return Err(KvfsError::Validation {
            message: "path cannot be empty".into(),
            context: Some(operation.into()),
        });
    }
    Ok(())
}
