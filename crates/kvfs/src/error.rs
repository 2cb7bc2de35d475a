//! # Kvfs Errors
//!
//! [`KvfsError`] separates failures this crate detects itself (configuration and
//! validation) from failures reported by the store or codec it drives. The latter keep
//! the collaborator's error as their source.

use std::borrow::Cow;

#[kvfs_derive::kvfs_error]
pub enum KvfsError {
    /// The instance cannot be built, e.g. the namespace prefix is empty.
    #[error("Invalid configuration{}: {message}", format_context(.context))]
    Configuration { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A path argument was rejected before any store access.
    #[error("Validation failed{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The regex engine refused the compiled wildcard expression.
    #[error("Pattern compilation failed{}: {source}", format_context(.context))]
    Pattern { source: regex::Error, context: Option<Cow<'static, str>> },

    /// The underlying key-value store failed.
    #[error("Store failure{}: {source}", format_context(.context))]
    Store { source: kvfs_storage::StorageError, context: Option<Cow<'static, str>> },

    /// A value could not be encoded to or decoded from its stored text.
    #[error("Codec failure{}: {source}", format_context(.context))]
    Codec {
        source: Box<dyn std::error::Error + Send + Sync>,
        context: Option<Cow<'static, str>>,
    },
}
