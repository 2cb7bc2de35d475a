use crate::codec::{Codec, JsonCodec};
use crate::error::KvfsError;
use crate::fs::Kvfs;
use crate::namespace::Namespace;
use kvfs_storage::KeyValueStore;
use private::Sealed;

#[derive(Debug, Default)]
pub struct NoStore;
#[derive(Debug)]
pub struct WithStore<S>(S);

mod private {
    pub(super) trait Sealed {}
}
impl Sealed for NoStore {}
impl<S> Sealed for WithStore<S> {}

/// Fluent configuration for a [`Kvfs`] instance.
///
/// A store is required before [`build`](KvfsBuilder::build) becomes available; the
/// prefix is validated by `build` itself.
#[allow(private_bounds)]
#[derive(Debug, Default)]
pub struct KvfsBuilder<S: Sealed = NoStore, C = JsonCodec> {
    state: S,
    prefix: String,
    codec: C,
}

#[allow(private_bounds)]
impl<S: Sealed, C> KvfsBuilder<S, C> {
    /// Sets the namespace prefix every key of the instance starts with.
    #[must_use = "The builder must be finished with .build()"]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Replaces the value codec.
    #[must_use = "The builder must be finished with .build()"]
    pub fn codec<N: Codec>(self, codec: N) -> KvfsBuilder<S, N> {
        KvfsBuilder { state: self.state, prefix: self.prefix, codec }
    }
}

impl KvfsBuilder {
    #[must_use = "Creates a new builder with the JSON codec and no store"]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C> KvfsBuilder<NoStore, C> {
    #[must_use = "The builder must be finished with .build()"]
    pub fn store<S: KeyValueStore>(self, store: S) -> KvfsBuilder<WithStore<S>, C> {
        KvfsBuilder { state: WithStore(store), prefix: self.prefix, codec: self.codec }
    }
}

impl<S: KeyValueStore, C: Codec> KvfsBuilder<WithStore<S>, C> {
    /// Finishes the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`KvfsError::Configuration`] if no prefix, or an empty one, was set.
    pub fn build(self) -> Result<Kvfs<S, C>, KvfsError> {
        let namespace = Namespace::new(self.prefix)?;
        Ok(Kvfs::from_parts(self.state.0, self.codec, namespace))
    }
}
