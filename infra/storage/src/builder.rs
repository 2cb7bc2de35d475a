use crate::engine::{Compression, DiskStore, DiskStoreInner};
use crate::error::{StorageError, StorageErrorExt};
use private::Sealed;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;
use tracing::info;

#[derive(Debug, Clone)]
struct DiskStoreConfig {
    compression: Compression,
    create: bool,
}

impl Default for DiskStoreConfig {
    fn default() -> Self {
        Self { compression: Compression::None, create: true }
    }
}

#[derive(Debug, Default)]
pub struct NoRoot;
#[derive(Debug)]
pub struct WithRoot(PathBuf);

mod private {
    pub(super) trait Sealed {}
}
impl Sealed for NoRoot {}
impl Sealed for WithRoot {}

/// Fluent configuration for a [`DiskStore`]. A root directory is required before
/// [`connect`](DiskStoreBuilder::connect) becomes available.
#[allow(private_bounds)]
#[derive(Debug, Default)]
pub struct DiskStoreBuilder<S: Sealed = NoRoot> {
    state: S,
    config: DiskStoreConfig,
}

#[allow(private_bounds)]
impl<S: Sealed> DiskStoreBuilder<S> {
    #[must_use = "Sets compression for values written by the store"]
    pub const fn compression(mut self, compression: Compression) -> Self {
        self.config.compression = compression;
        self
    }

    #[must_use = "Sets whether the root directory should be created if it does not exist"]
    pub const fn create(mut self, enable: bool) -> Self {
        self.config.create = enable;
        self
    }

    fn transition<N: Sealed>(self, state: N) -> DiskStoreBuilder<N> {
        DiskStoreBuilder { state, config: self.config }
    }
}

impl DiskStoreBuilder<NoRoot> {
    #[must_use = "Creates a new store builder with default configuration"]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "Sets the root directory of the store"]
    pub fn root(self, path: impl Into<PathBuf>) -> DiskStoreBuilder<WithRoot> {
        self.transition(WithRoot(path.into()))
    }
}

impl DiskStoreBuilder<WithRoot> {
    /// Consumes the configuration and opens the store.
    ///
    /// 1. **Bootstrapping**: creates the root directory if `create(true)` was set.
    /// 2. **Canonicalization**: resolves the root to an absolute physical path.
    /// 3. **Self-Healing**: removes stale temp files left behind by interrupted writes.
    ///    Cleanup failures are logged and do not abort the connection.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the root does not exist and `create` is false,
    /// or if it cannot be created or resolved.
    pub async fn connect(self) -> Result<DiskStore, StorageError> {
        let root = &self.state.0;

        if self.config.create {
            fs::create_dir_all(root)
                .await
                .context(format!("Failed to bootstrap store root: {}", root.display()))?;
            info!(path = %root.display(), "Bootstrapped store root directory");
        }

        let canonical = fs::canonicalize(root)
            .await
            .context(format!("Failed to resolve store root: {}", root.display()))?;

        let store = DiskStore {
            inner: Arc::new(DiskStoreInner {
                root: canonical,
                compression: self.config.compression,
            }),
        };

        store.purge_tmp().await;

        Ok(store)
    }
}
