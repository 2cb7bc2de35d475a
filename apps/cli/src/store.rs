use crate::models::config::{Backend, StoreConfig};
use kvfs::{DiskStore, KeyValueStore, MemoryStore, StorageError};

/// The backend selected by configuration.
#[derive(Debug, Clone)]
pub enum AnyStore {
    Disk(DiskStore),
    Memory(MemoryStore),
}

impl AnyStore {
    /// Opens the configured backend, bootstrapping the disk root if needed.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the data directory cannot be created or resolved.
    pub async fn open(config: &StoreConfig) -> Result<Self, StorageError> {
        match config.backend {
            Backend::Disk => {
                let store = DiskStore::builder()
                    .root(&config.data_dir)
                    .compression(config.compression)
                    .connect()
                    .await?;
                Ok(Self::Disk(store))
            },
            Backend::Memory => Ok(Self::Memory(MemoryStore::new())),
        }
    }
}

impl KeyValueStore for AnyStore {
    async fn all_keys(&self) -> Result<Vec<String>, StorageError> {
        match self {
            Self::Disk(s) => s.all_keys().await,
            Self::Memory(s) => s.all_keys().await,
        }
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self {
            Self::Disk(s) => s.get(key).await,
            Self::Memory(s) => s.get(key).await,
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        match self {
            Self::Disk(s) => s.set(key, value).await,
            Self::Memory(s) => s.set(key, value).await,
        }
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        match self {
            Self::Disk(s) => s.remove(key).await,
            Self::Memory(s) => s.remove(key).await,
        }
    }

    async fn get_many(&self, keys: &[String]) -> Result<Vec<(String, Option<String>)>, StorageError> {
        match self {
            Self::Disk(s) => s.get_many(keys).await,
            Self::Memory(s) => s.get_many(keys).await,
        }
    }

    async fn set_many(&self, entries: Vec<(String, String)>) -> Result<(), StorageError> {
        match self {
            Self::Disk(s) => s.set_many(entries).await,
            Self::Memory(s) => s.set_many(entries).await,
        }
    }

    async fn remove_many(&self, keys: &[String]) -> Result<(), StorageError> {
        match self {
            Self::Disk(s) => s.remove_many(keys).await,
            Self::Memory(s) => s.remove_many(keys).await,
        }
    }
}
