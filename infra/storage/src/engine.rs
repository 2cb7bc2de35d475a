//! The on-disk key-value store.
//!
//! [`DiskStore`] keeps one file per key under a canonicalized root directory (see
//! [`layout`](crate::layout) for the naming scheme), writes every value with an atomic
//! temp-file swap, and optionally compresses values with LZ4.

use crate::builder::DiskStoreBuilder;
use crate::error::{StorageError, StorageErrorExt};
use crate::layout::{TMP_MARKER, key_to_path};
use crate::maintenance;
use crate::store::KeyValueStore;
use serde::Deserialize;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    #[default]
    None,
    Lz4,
}

impl Compression {
    #[must_use]
    fn compress(self, data: &[u8]) -> Vec<u8> {
        match self {
            Self::None => data.to_vec(),
            Self::Lz4 => lz4_flex::compress_prepend_size(data),
        }
    }

    fn decompress(self, data: Vec<u8>) -> Result<Vec<u8>, StorageError> {
        match self {
            Self::None => Ok(data),
            Self::Lz4 => {
                lz4_flex::decompress_size_prepended(&data).context("Lz4 decompression failed")
            },
        }
    }
}

/// The shared state behind a [`DiskStore`] handle.
#[derive(Debug)]
pub struct DiskStoreInner {
    /// Canonicalized directory holding every data file.
    pub(crate) root: PathBuf,
    /// Compression applied to every value written by this handle.
    pub(crate) compression: Compression,
}

/// A thread-safe handle to a directory-backed key-value store.
///
/// All values written through one root must use the same [`Compression`] setting;
/// the files carry no header recording how they were written.
///
/// The handle is reference-counted and cheap to clone.
///
/// # Example
///
/// ```rust
/// use kvfs_storage::{Compression, DiskStore, KeyValueStore, StorageError};
///
/// #[tokio::main]
/// async fn main() -> Result<(), StorageError> {
///     # let tmp = tempfile::tempdir().unwrap();
///     # let root = tmp.path().join("data");
///     let store = DiskStore::builder()
///         .root(&root)
///         .create(true)
///         .compression(Compression::Lz4)
///         .connect()
///         .await?;
///
///     store.set("/app/settings", r#"{"theme":"dark"}"#.to_owned()).await?;
///     assert_eq!(store.get("/app/settings").await?.as_deref(), Some(r#"{"theme":"dark"}"#));
///     assert_eq!(store.all_keys().await?, vec!["/app/settings"]);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct DiskStore {
    pub(crate) inner: Arc<DiskStoreInner>,
}

impl Deref for DiskStore {
    type Target = DiskStoreInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DiskStore {
    #[must_use = "The store is not opened until you call .connect()"]
    pub fn builder() -> DiskStoreBuilder {
        DiskStoreBuilder::new()
    }

    /// The canonical root directory of this store.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// Physical location of the file holding `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidKey`] for empty keys or keys longer than
    /// [`MAX_KEY_LEN`](crate::MAX_KEY_LEN) bytes.
    pub fn resolve(&self, key: &str) -> Result<PathBuf, StorageError> {
        key_to_path(&self.root, key)
    }

    /// Removes temp files abandoned by interrupted writes.
    pub async fn purge_tmp(&self) {
        maintenance::purge_tmp(&self.root).await;
    }

    async fn read_value(&self, key: &str) -> Result<Option<String>, StorageError> {
        let resolved = self.resolve(key)?;

        let data = match fs::read(&resolved).await {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(StorageError::Io {
                    source: err,
                    context: Some(format!("Read failed: {}", resolved.display()).into()),
                });
            },
        };

        let plain = self.compression.decompress(data).context(format!("Key {key}"))?;
        let text = String::from_utf8(plain).context(format!("Key {key}"))?;
        Ok(Some(text))
    }

    /// Writes a value with an atomic swap.
    ///
    /// 1. The bytes go to a unique temp file (`<name>.kvfstmp.<pid>.<n>`) next to the target.
    /// 2. The temp file is synced to hardware.
    /// 3. The temp file is renamed over the target, so readers see the old or the new
    ///    value and never a partial one.
    async fn write_value(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let resolved = self.resolve(key)?;

        if let Some(parent) = resolved.parent() {
            fs::create_dir_all(parent)
                .await
                .context(format!("Failed to create shards for {}", resolved.display()))?;
        }

        let temp = unique_tmp_path(&resolved, &TMP_COUNTER);
        let payload = self.compression.compress(value.as_bytes());

        {
            let mut file = fs::OpenOptions::new()
                .create_new(true)
                .write(true)
                .open(&temp)
                .await
                .context(format!("Temp creation failed: {}", temp.display()))?;
            file.write_all(&payload).await.context("Write failed")?;
            file.sync_all().await.context("Hardware sync failed")?;
        }

        if let Err(err) = fs::rename(&temp, &resolved).await {
            if err.kind() == std::io::ErrorKind::AlreadyExists {
                fs::remove_file(&resolved)
                    .await
                    .context(format!("Failed to replace existing file: {}", resolved.display()))?;
                fs::rename(&temp, &resolved).await.context(format!(
                    "Atomic swap failed: {} -> {}",
                    temp.display(),
                    resolved.display()
                ))?;
            } else {
                let _ = fs::remove_file(&temp).await;
                return Err(StorageError::Io {
                    source: err,
                    context: Some(
                        format!("Atomic swap failed: {} -> {}", temp.display(), resolved.display())
                            .into(),
                    ),
                });
            }
        }

        if let Some(parent) = resolved.parent() {
            Self::sync_dir(parent).await;
        }

        debug!(key, path = %resolved.display(), "Value saved atomically");
        Ok(())
    }

    async fn delete_value(&self, key: &str) -> Result<(), StorageError> {
        let resolved = self.resolve(key)?;
        match fs::remove_file(&resolved).await {
            Ok(()) => debug!(key, "Value deleted"),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {},
            Err(err) => {
                return Err(StorageError::Io {
                    source: err,
                    context: Some(format!("Failed to delete: {}", resolved.display()).into()),
                });
            },
        }
        Ok(())
    }

    async fn sync_dir(path: &Path) {
        match fs::File::open(path).await {
            Ok(dir) => {
                if let Err(err) = dir.sync_all().await {
                    tracing::warn!(path = %path.display(), error = %err, "Directory sync failed");
                }
            },
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "Directory open failed");
            },
        }
    }
}

impl KeyValueStore for DiskStore {
    async fn all_keys(&self) -> Result<Vec<String>, StorageError> {
        let root = self.root.clone();
        tokio::task::spawn_blocking(move || maintenance::collect_keys(&root)).await.map_err(|e| {
            StorageError::Internal {
                message: e.to_string().into(),
                context: Some("Key listing task failed".into()),
            }
        })
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.read_value(key).await
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.write_value(key, &value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.delete_value(key).await
    }

    async fn get_many(&self, keys: &[String]) -> Result<Vec<(String, Option<String>)>, StorageError> {
        let mut out = Vec::with_capacity(keys.len());
        for key in keys {
            out.push((key.clone(), self.read_value(key).await?));
        }
        Ok(out)
    }

    async fn set_many(&self, entries: Vec<(String, String)>) -> Result<(), StorageError> {
        // An invalid key aborts the batch before anything is written.
        for (key, _) in &entries {
            self.resolve(key)?;
        }
        for (key, value) in &entries {
            self.write_value(key, value).await?;
        }
        Ok(())
    }

    async fn remove_many(&self, keys: &[String]) -> Result<(), StorageError> {
        for key in keys {
            self.resolve(key)?;
        }
        for key in keys {
            self.delete_value(key).await?;
        }
        Ok(())
    }
}

/// Shared by every handle in the process; the pid separates processes.
static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

fn unique_tmp_path(target: &Path, counter: &AtomicU64) -> PathBuf {
    let counter = counter.fetch_add(1, Ordering::Relaxed);
    let pid = std::process::id();
    let file_name = target.file_name().and_then(|s| s.to_str()).unwrap_or("value");
    target.with_file_name(format!("{file_name}{TMP_MARKER}{pid}.{counter}"))
}
