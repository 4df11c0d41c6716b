//! Configuration for wiring the task stack to its storage backends.
//!
//! Configuration is a JSON document; every field has a default, so a missing
//! file yields a guest-only setup storing data under `.taskstack`.

use crate::task::{
    adapters::{
        ScopedTaskRepository,
        local::{DEFAULT_GUEST_KEY, FileKeyValueStore, LocalTaskRepository},
        postgres::{PostgresTaskRepository, build_pool},
    },
    ports::{KeyValueStoreError, TaskRepositoryError, is_portable_key},
    services::PersistencePolicy,
};
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use serde::{Deserialize, Serialize};
use std::io;
use thiserror::Error;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV_VAR: &str = "TASKSTACK_CONFIG_PATH";

/// Environment variable overriding `remote.database_url`.
pub const DATABASE_URL_ENV_VAR: &str = "TASKSTACK_DATABASE_URL";

const CONFIG_FILE_NAME: &str = "taskstack.json";

/// Errors raised while loading configuration or opening backends.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Path of the configuration file.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON for this schema.
    #[error("failed to parse config {path}: {source}")]
    Parse {
        /// Path of the configuration file.
        path: Utf8PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// A configured value is unusable.
    #[error("invalid config value for {field}: {reason}")]
    Invalid {
        /// Offending field.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },

    /// The local storage directory could not be opened.
    #[error(transparent)]
    Storage(#[from] KeyValueStoreError),

    /// The remote store could not be reached.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
}

/// Device-local storage settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalConfig {
    /// Directory holding the key-value files.
    pub directory: Utf8PathBuf,
    /// Storage key of the guest task list.
    pub guest_key: String,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            directory: Utf8PathBuf::from(".taskstack"),
            guest_key: DEFAULT_GUEST_KEY.to_owned(),
        }
    }
}

/// Remote store settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// `PostgreSQL` connection URL; remote storage is disabled when unset.
    pub database_url: Option<String>,
    /// Maximum pooled connections.
    pub max_connections: u32,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            max_connections: 4,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskStackConfig {
    /// Device-local storage settings.
    pub local: LocalConfig,
    /// Remote store settings.
    pub remote: RemoteConfig,
    /// What to do with in-memory state when persistence fails.
    pub persistence_policy: PersistencePolicy,
}

/// Returns the configuration path from [`CONFIG_ENV_VAR`], falling back to
/// `taskstack.json` in the working directory.
#[must_use]
pub fn config_path() -> Utf8PathBuf {
    std::env::var(CONFIG_ENV_VAR)
        .ok()
        .filter(|path| !path.trim().is_empty())
        .map_or_else(|| Utf8PathBuf::from(CONFIG_FILE_NAME), Utf8PathBuf::from)
}

/// Reads the file at `path` through a capability handle on its parent
/// directory.
fn read_config_file(path: &Utf8Path) -> io::Result<String> {
    let file_name = path.file_name().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "config path names no file")
    })?;
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let dir = Dir::open_ambient_dir(parent, ambient_authority())?;
    dir.read_to_string(file_name)
}

impl TaskStackConfig {
    /// Loads configuration from `path`, using defaults when the file is
    /// missing, then applies environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file exists but cannot be read,
    /// [`ConfigError::Parse`] for malformed content, or
    /// [`ConfigError::Invalid`] when validation fails.
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let mut config = match read_config_file(path) {
            Ok(content) => Self::from_json(path, &content)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path, "config file missing, using defaults");
                Self::default()
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_owned(),
                    source,
                });
            }
        };
        config.apply_overrides(std::env::var(DATABASE_URL_ENV_VAR).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_json(path: &Utf8Path, content: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })
    }

    /// Applies a database URL override; blank values are ignored.
    pub fn apply_overrides(&mut self, database_url: Option<String>) {
        if let Some(url) = database_url.filter(|url| !url.trim().is_empty()) {
            self.remote.database_url = Some(url);
        }
    }

    /// Checks values that would otherwise fail late.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_portable_key(&self.local.guest_key) {
            return Err(ConfigError::Invalid {
                field: "local.guest_key",
                reason: format!(
                    "'{}' must use only ASCII letters, digits, '-' and '_'",
                    self.local.guest_key
                ),
            });
        }
        if self.remote.max_connections == 0 {
            return Err(ConfigError::Invalid {
                field: "remote.max_connections",
                reason: "must be at least 1".to_owned(),
            });
        }
        Ok(())
    }

    /// Opens the device-local repository.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Storage`] when the directory cannot be opened.
    pub fn open_local_repository(
        &self,
    ) -> Result<LocalTaskRepository<FileKeyValueStore>, ConfigError> {
        let store = FileKeyValueStore::open(&self.local.directory)?;
        Ok(LocalTaskRepository::with_guest_key(
            store,
            self.local.guest_key.clone(),
        ))
    }

    /// Opens the remote repository, or `None` when no database is configured.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Repository`] when the pool cannot connect.
    pub fn open_remote_repository(&self) -> Result<Option<PostgresTaskRepository>, ConfigError> {
        let Some(url) = self.remote.database_url.as_deref() else {
            return Ok(None);
        };
        let pool = build_pool(url, self.remote.max_connections)?;
        tracing::info!(max_connections = self.remote.max_connections, "connected remote task store");
        Ok(Some(PostgresTaskRepository::new(pool)))
    }

    /// Opens both backends behind a scope router.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when no database URL is configured,
    /// or the errors of [`Self::open_local_repository`] and
    /// [`Self::open_remote_repository`].
    pub fn open_scoped_repository(
        &self,
    ) -> Result<
        ScopedTaskRepository<LocalTaskRepository<FileKeyValueStore>, PostgresTaskRepository>,
        ConfigError,
    > {
        let local = self.open_local_repository()?;
        let remote = self
            .open_remote_repository()?
            .ok_or_else(|| ConfigError::Invalid {
                field: "remote.database_url",
                reason: "required for signed-in users".to_owned(),
            })?;
        Ok(ScopedTaskRepository::new(local, remote))
    }
}
