use crate::error::KvfsError;
use crate::pattern::Pattern;
use std::fmt;
use std::sync::Arc;

/// The fixed prefix under which one instance keeps all of its keys.
///
/// Every store key an instance touches is `prefix + path`. The prefix can never be
/// empty: an empty prefix would make the instance's namespace the whole store, and a
/// forced purge would then wipe data owned by others.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace {
    prefix: Arc<str>,
}

impl TryFrom<String> for Namespace {
    type Error = KvfsError;

    fn try_from(value: String) -> Result<Self, KvfsError> {
        if value.is_empty() {
            return Err(KvfsError::Configuration {
                message: "EMPTY".into(),
                context: Some("Namespace prefix cannot be empty".into()),
            });
        }

        Ok(Self { prefix: value.into() })
    }
}

impl TryFrom<&str> for Namespace {
    type Error = KvfsError;

    fn try_from(value: &str) -> Result<Self, KvfsError> {
        Self::try_from(value.to_owned())
    }
}

impl Namespace {
    /// # Errors
    ///
    /// Returns [`KvfsError::Configuration`] if `prefix` is empty.
    pub fn new(prefix: impl Into<String>) -> Result<Self, KvfsError> {
        Self::try_from(prefix.into())
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Store key for a public path.
    #[must_use]
    pub fn to_key(&self, path: &str) -> String {
        let mut key = String::with_capacity(self.prefix.len() + path.len());
        key.push_str(&self.prefix);
        key.push_str(path);
        key
    }

    /// Public path for a store key. The caller guarantees that `key` is owned by this
    /// namespace; no membership check is repeated here.
    #[must_use]
    pub fn from_key<'k>(&self, key: &'k str) -> &'k str {
        key.get(self.prefix.len()..).unwrap_or_default()
    }

    /// `true` iff `key` lives under this namespace.
    #[must_use]
    pub fn owns(&self, key: &str) -> bool {
        key.starts_with(&*self.prefix)
    }

    /// Compiles a wildcard spec against this namespace.
    ///
    /// # Errors
    ///
    /// See [`Pattern::compile`].
    pub fn pattern(&self, spec: &str) -> Result<Pattern, KvfsError> {
        Pattern::compile(&self.prefix, spec)
    }
}

impl AsRef<str> for Namespace {
    fn as_ref(&self) -> &str {
        &self.prefix
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.prefix)
    }
}
