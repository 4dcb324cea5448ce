//! Persistent preference store
//!
//! Holds the unit preference, search history and last selected view across
//! sessions in an embedded keyspace. Values are stored as JSON.

use crate::dashboard::View;
use crate::history::HistoryEntry;
use crate::models::TemperatureUnit;
use anyhow::{Context, Result};
use fjall::Keyspace;
use serde::{Serialize, de::DeserializeOwned};
use std::fmt::Debug;
use std::path::Path;
use tokio::task;

pub const UNIT_KEY: &str = "weatherUnit";
pub const HISTORY_KEY: &str = "searchHistory";
pub const VIEW_KEY: &str = "currentView";

#[derive(Clone)]
pub struct PreferenceStore {
    store: Keyspace,
}

impl Debug for PreferenceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreferenceStore").finish_non_exhaustive()
    }
}

fn get_from_store(store: Keyspace, key: Vec<u8>) -> Result<Option<Vec<u8>>> {
    Ok(store.get(key)?.map(|v| v.to_vec()))
}

impl PreferenceStore {
    /// Open (or create) the store at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create storage directory: {}", path.display()))?;
        let db = fjall::Database::builder(path)
            .open()
            .with_context(|| format!("Failed to open preference store at {}", path.display()))?;
        let items = db.keyspace("preferences", fjall::KeyspaceCreateOptions::default)?;
        Ok(PreferenceStore { store: items })
    }

    /// Stores a serializable value under `key`.
    #[tracing::instrument(name = "put_preference", level = "debug", skip(self, value))]
    pub async fn put<T: Serialize + Debug>(&self, key: &str, value: &T) -> Result<()> {
        let store = self.store.clone();
        let key = key.as_bytes().to_vec();
        let bytes = serde_json::to_vec(value)
            .with_context(|| format!("Failed to serialize value for {key:?}"))?;

        task::spawn_blocking(move || store.insert(key, bytes)).await??;
        Ok(())
    }

    /// Retrieves the value under `key`. Returns `None` when it was never set.
    #[tracing::instrument(name = "get_preference", level = "debug", skip(self))]
    pub async fn get<T: DeserializeOwned + Send + 'static>(&self, key: &str) -> Result<Option<T>> {
        let store = self.store.clone();
        let key_bytes = key.as_bytes().to_vec();

        let maybe_bytes: Option<Vec<u8>> =
            task::spawn_blocking(move || get_from_store(store, key_bytes)).await??;

        match maybe_bytes {
            Some(bytes) => {
                let value = serde_json::from_slice(&bytes)
                    .with_context(|| format!("Stored value for '{key}' is not valid"))?;
                Ok(Some(value))
            }
            None => {
                tracing::debug!("Key not found");
                Ok(None)
            }
        }
    }

    /// Removes `key` if present.
    pub async fn remove(&self, key: &str) -> Result<()> {
        let key = key.as_bytes().to_vec();
        let store = self.store.clone();
        task::spawn_blocking(move || store.remove(key)).await??;
        Ok(())
    }

    pub async fn load_unit(&self) -> Result<TemperatureUnit> {
        Ok(self.get(UNIT_KEY).await?.unwrap_or_default())
    }

    pub async fn save_unit(&self, unit: TemperatureUnit) -> Result<()> {
        self.put(UNIT_KEY, &unit).await
    }

    pub async fn load_history(&self) -> Result<Vec<HistoryEntry>> {
        Ok(self.get(HISTORY_KEY).await?.unwrap_or_default())
    }

    pub async fn save_history(&self, entries: &[HistoryEntry]) -> Result<()> {
        self.put(HISTORY_KEY, &entries).await
    }

    pub async fn load_view(&self) -> Result<View> {
        Ok(self.get(VIEW_KEY).await?.unwrap_or_default())
    }

    pub async fn save_view(&self, view: View) -> Result<()> {
        self.put(VIEW_KEY, &view).await
    }
}
