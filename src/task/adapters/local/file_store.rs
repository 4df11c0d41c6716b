//! File-backed key-value store rooted in a capability directory.

use async_trait::async_trait;
use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use std::io;
use std::sync::Arc;

use crate::task::ports::{KeyValueResult, KeyValueStore, KeyValueStoreError, is_portable_key};

const VALUE_EXTENSION: &str = "json";

/// Key-value store keeping one file per key inside a single directory.
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// reader sees either the old or the new value.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    dir: Arc<Dir>,
}

impl FileKeyValueStore {
    /// Opens the store at `path`, creating the directory when missing.
    ///
    /// # Errors
    ///
    /// Returns [`KeyValueStoreError::Io`] when the directory cannot be
    /// created or opened.
    pub fn open(path: &Utf8Path) -> KeyValueResult<Self> {
        Dir::create_ambient_dir_all(path, ambient_authority())?;
        let dir = Dir::open_ambient_dir(path, ambient_authority())?;
        Ok(Self { dir: Arc::new(dir) })
    }

    async fn run_blocking<F, T>(&self, f: F) -> KeyValueResult<T>
    where
        F: FnOnce(&Dir) -> io::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let dir = Arc::clone(&self.dir);
        let result = tokio::task::spawn_blocking(move || f(&dir))
            .await
            .map_err(io::Error::other)?;
        Ok(result?)
    }
}

fn file_names(key: &str) -> KeyValueResult<(String, String)> {
    if !is_portable_key(key) {
        return Err(KeyValueStoreError::InvalidKey(key.to_owned()));
    }
    Ok((
        format!("{key}.{VALUE_EXTENSION}"),
        format!(".{key}.{VALUE_EXTENSION}.tmp"),
    ))
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> KeyValueResult<Option<String>> {
        let (file_name, _) = file_names(key)?;
        self.run_blocking(move |dir| match dir.read_to_string(&file_name) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        })
        .await
    }

    async fn set(&self, key: &str, value: &str) -> KeyValueResult<()> {
        let (file_name, temp_name) = file_names(key)?;
        let contents = value.to_owned();
        self.run_blocking(move |dir| {
            dir.write(&temp_name, contents.as_bytes())?;
            dir.rename(&temp_name, dir, &file_name)
        })
        .await
    }

    async fn remove(&self, key: &str) -> KeyValueResult<()> {
        let (file_name, _) = file_names(key)?;
        self.run_blocking(move |dir| match dir.remove_file(&file_name) {
            Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err),
            _ => Ok(()),
        })
        .await
    }
}
