#![allow(dead_code)]

use kvfs::{KeyValueStore, Kvfs, MemoryStore, StorageError};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const PREFIX: &str = "/kvfs";

/// Per-method call counters of a [`RecordingStore`].
#[derive(Debug, Default)]
pub struct Calls {
    pub all_keys: AtomicUsize,
    pub get: AtomicUsize,
    pub set: AtomicUsize,
    pub remove: AtomicUsize,
    pub get_many: AtomicUsize,
    pub set_many: AtomicUsize,
    pub remove_many: AtomicUsize,
}

impl Calls {
    /// Total number of store calls that read or mutate values (listing excluded).
    pub fn data_calls(&self) -> usize {
        [&self.get, &self.set, &self.remove, &self.get_many, &self.set_many, &self.remove_many]
            .iter()
            .map(|c| c.load(Ordering::SeqCst))
            .sum()
    }

    pub fn total(&self) -> usize {
        self.data_calls() + self.all_keys.load(Ordering::SeqCst)
    }
}

/// A [`MemoryStore`] that counts how often each method is called.
#[derive(Debug, Clone, Default)]
pub struct RecordingStore {
    pub inner: MemoryStore,
    pub calls: Arc<Calls>,
}

impl RecordingStore {
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self { inner: MemoryStore::with_entries(entries), calls: Arc::default() }
    }
}

fn bump(counter: &AtomicUsize) {
    counter.fetch_add(1, Ordering::SeqCst);
}

impl KeyValueStore for RecordingStore {
    async fn all_keys(&self) -> Result<Vec<String>, StorageError> {
        bump(&self.calls.all_keys);
        self.inner.all_keys().await
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        bump(&self.calls.get);
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        bump(&self.calls.set);
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        bump(&self.calls.remove);
        self.inner.remove(key).await
    }

    async fn get_many(&self, keys: &[String]) -> Result<Vec<(String, Option<String>)>, StorageError> {
        bump(&self.calls.get_many);
        self.inner.get_many(keys).await
    }

    async fn set_many(&self, entries: Vec<(String, String)>) -> Result<(), StorageError> {
        bump(&self.calls.set_many);
        self.inner.set_many(entries).await
    }

    async fn remove_many(&self, keys: &[String]) -> Result<(), StorageError> {
        bump(&self.calls.remove_many);
        self.inner.remove_many(keys).await
    }
}

/// A store whose every call fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingStore;

fn unavailable<T>() -> Result<T, StorageError> {
    Err(StorageError::Internal { message: "store unavailable".into(), context: None })
}

impl KeyValueStore for FailingStore {
    async fn all_keys(&self) -> Result<Vec<String>, StorageError> {
        unavailable()
    }

    async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        unavailable()
    }

    async fn set(&self, _key: &str, _value: String) -> Result<(), StorageError> {
        unavailable()
    }

    async fn remove(&self, _key: &str) -> Result<(), StorageError> {
        unavailable()
    }

    async fn get_many(&self, _keys: &[String]) -> Result<Vec<(String, Option<String>)>, StorageError> {
        unavailable()
    }

    async fn set_many(&self, _entries: Vec<(String, String)>) -> Result<(), StorageError> {
        unavailable()
    }

    async fn remove_many(&self, _keys: &[String]) -> Result<(), StorageError> {
        unavailable()
    }
}

/// Builds a JSON instance under [`PREFIX`] over a recording store seeded with raw
/// `(key, stored text)` pairs.
/// # Panics
/// * If the prefix is rejected, which it never is.
pub fn setup_fs<'a>(
    entries: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> (Kvfs<RecordingStore>, RecordingStore) {
    let store = RecordingStore::with_entries(entries);
    let fs = Kvfs::new(store.clone(), PREFIX).expect("Kvfs setup failed");
    (fs, store)
}

/// Seeds `paths` under [`PREFIX`], each holding the JSON string of its own path.
/// # Panics
/// * If the prefix is rejected, which it never is.
pub fn setup_paths(paths: &[&str]) -> (Kvfs<RecordingStore>, RecordingStore) {
    let entries = paths.iter().map(|p| (format!("{PREFIX}{p}"), format!("\"{p}\"")));
    let store = RecordingStore { inner: MemoryStore::with_entries(entries), calls: Arc::default() };
    let fs = Kvfs::new(store.clone(), PREFIX).expect("Kvfs setup failed");
    (fs, store)
}
