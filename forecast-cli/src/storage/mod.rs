// Local storage module using sled embedded database.
// Values are JSON-encoded strings, one tree per storage scope.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use sled::{Db, Tree};
use std::path::{Path, PathBuf};

use crate::config::Config;

/// Persistent tree holding the token, current user and user directory
const LOCAL_TREE: &str = "local";
/// Tree holding data that only lives until the session ends
const SESSION_TREE: &str = "session";

/// Key of the bearer token returned by the login endpoint
pub const AUTH_TOKEN_KEY: &str = "faculty_auth_token";
/// Key of the signed-in user snapshot
pub const CURRENT_USER_KEY: &str = "currentUser";
/// Key of the signed-up user directory
pub const USERS_KEY: &str = "users";
/// Key of the last prediction handed to the results view
pub const PREDICTION_RESULT_KEY: &str = "predictionResult";

/// Environment variable overriding the database location
pub const DB_PATH_ENV: &str = "STUDENT_FORECAST_DB_PATH";

/// Storage manager for local embedded database
pub struct Storage {
    db: Db,
}

impl Storage {
    /// Database directory, checking the test override first
    pub fn db_path(config: &Config) -> Result<PathBuf> {
        if let Ok(path) = std::env::var(DB_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }

        config.data_dir()
    }

    /// Open the database at the configured location
    pub fn init(config: &Config) -> Result<Self> {
        Self::open(&Self::db_path(config)?)
    }

    /// Open the database at an explicit path
    pub fn open(path: &Path) -> Result<Self> {
        tracing::debug!("Opening sled database at {:?}", path);

        let db = sled::open(path).context("Failed to open sled database")?;

        Ok(Self { db })
    }

    /// Store that survives process restarts
    pub fn local(&self) -> Result<Store> {
        self.tree(LOCAL_TREE)
    }

    /// Store scoped to the current session
    pub fn session(&self) -> Result<Store> {
        self.tree(SESSION_TREE)
    }

    fn tree(&self, name: &str) -> Result<Store> {
        let tree = self
            .db
            .open_tree(name)
            .with_context(|| format!("Failed to open {} tree", name))?;

        Ok(Store { tree })
    }
}

/// A string key-value namespace inside the database
#[derive(Clone)]
pub struct Store {
    tree: Tree,
}

impl Store {
    pub fn put(&self, key: &str, value: impl AsRef<[u8]>) -> Result<()> {
        self.tree
            .insert(key.as_bytes(), value.as_ref())
            .with_context(|| format!("Failed to write {}", key))?;

        self.tree.flush().context("Failed to flush database")?;

        tracing::debug!("Stored {}", key);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let Some(value) = self
            .tree
            .get(key.as_bytes())
            .with_context(|| format!("Failed to read {}", key))?
        else {
            return Ok(None);
        };

        let value = String::from_utf8(value.to_vec())
            .with_context(|| format!("Stored value for {} is not valid UTF-8", key))?;

        Ok(Some(value))
    }

    /// Read and decode a JSON value.
    ///
    /// Bytes that are not valid UTF-8 JSON of the expected shape count as
    /// absent, so one corrupt entry never blocks the caller.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(value) = self
            .tree
            .get(key.as_bytes())
            .with_context(|| format!("Failed to read {}", key))?
        else {
            return Ok(None);
        };

        match serde_json::from_slice(&value) {
            Ok(decoded) => Ok(Some(decoded)),
            Err(e) => {
                tracing::warn!("Ignoring malformed {}: {}", key, e);
                Ok(None)
            }
        }
    }

    /// Remove a key. Removing an absent key is not an error.
    pub fn delete(&self, key: &str) -> Result<()> {
        let removed = self
            .tree
            .remove(key.as_bytes())
            .with_context(|| format!("Failed to delete {}", key))?
            .is_some();

        if removed {
            self.tree.flush().context("Failed to flush database")?;
            tracing::debug!("Deleted {}", key);
        }

        Ok(())
    }

    /// Remove every key in this namespace
    pub fn clear(&self) -> Result<()> {
        self.tree.clear().context("Failed to clear tree")?;
        self.tree.flush().context("Failed to flush database")?;
        Ok(())
    }
}
