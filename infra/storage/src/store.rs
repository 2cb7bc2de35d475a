//! The flat key-value contract every backend implements.
//!
//! Keys and values are plain strings. Backends know nothing about namespaces or
//! structured values; both are layered on top by the `kvfs` crate.

use crate::error::StorageError;
use std::future::Future;
use std::sync::Arc;

/// An asynchronous, flat key-value store.
///
/// # Contract
/// - [`get`](Self::get) distinguishes an absent key (`None`) from an empty value (`Some("")`).
/// - [`set`](Self::set) upserts.
/// - [`remove`](Self::remove) of an absent key succeeds.
/// - [`get_many`](Self::get_many) answers in the order of the requested keys.
/// - Batched calls are issued as one logical operation; whether they are atomic is up to the
///   backend.
pub trait KeyValueStore: Send + Sync {
    /// Returns every key held by the store, across all namespaces.
    fn all_keys(&self) -> impl Future<Output = Result<Vec<String>, StorageError>> + Send;

    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, StorageError>> + Send;

    fn set(&self, key: &str, value: String)
    -> impl Future<Output = Result<(), StorageError>> + Send;

    fn remove(&self, key: &str) -> impl Future<Output = Result<(), StorageError>> + Send;

    fn get_many(
        &self,
        keys: &[String],
    ) -> impl Future<Output = Result<Vec<(String, Option<String>)>, StorageError>> + Send;

    fn set_many(
        &self,
        entries: Vec<(String, String)>,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;

    fn remove_many(&self, keys: &[String])
    -> impl Future<Output = Result<(), StorageError>> + Send;
}

impl<S: KeyValueStore> KeyValueStore for Arc<S> {
    fn all_keys(&self) -> impl Future<Output = Result<Vec<String>, StorageError>> + Send {
        (**self).all_keys()
    }

    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, StorageError>> + Send {
        (**self).get(key)
    }

    fn set(
        &self,
        key: &str,
        value: String,
    ) -> impl Future<Output = Result<(), StorageError>> + Send {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> impl Future<Output = Result<(), StorageError>> + Send {
        (**self).remove(key)
    }

    fn get_many(
        &self,
        keys: &[String],
    ) -> impl Future<Output = Result<Vec<(String, Option<String>)>, StorageError>> + Send {
        (**self).get_many(keys)
    }

    fn set_many(
        &self,
        entries: Vec<(String, String)>,
    ) -> impl Future<Output = Result<(), StorageError>> + Send {
        (**self).set_many(entries)
    }

    fn remove_many(
        &self,
        keys: &[String],
    ) -> impl Future<Output = Result<(), StorageError>> + Send {
        (**self).remove_many(keys)
    }
}
