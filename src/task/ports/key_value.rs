//! Port for device-local key-value storage.

use async_trait::async_trait;
use thiserror::Error;

/// Result type for key-value store operations.
pub type KeyValueResult<T> = Result<T, KeyValueStoreError>;

/// String key-value storage, the device-local persistence primitive.
///
/// `set` replaces a value as a whole; readers never observe a partially
/// written value.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the value for `key`, or `None` when unset.
    async fn get(&self, key: &str) -> KeyValueResult<Option<String>>;

    /// Replaces the value for `key`.
    async fn set(&self, key: &str, value: &str) -> KeyValueResult<()>;

    /// Removes `key`. Removing an unset key is a no-op.
    async fn remove(&self, key: &str) -> KeyValueResult<()>;
}

/// Errors returned by key-value store implementations.
#[derive(Debug, Error)]
pub enum KeyValueStoreError {
    /// The key cannot be stored by this backend.
    #[error("invalid storage key '{0}'")]
    InvalidKey(String),

    /// Underlying storage I/O failed.
    #[error("storage i/o failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Returns whether `key` is made of ASCII alphanumerics, `-` and `_`.
///
/// Backends that map keys onto names (files, columns) accept only these.
#[must_use]
pub fn is_portable_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
}
