use crate::models::Habit;
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, error};

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";
pub const HABITS_KEY: &str = "habits";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to serialize '{key}': {source}")]
    Serialize {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// String key-value area holding the session and the habit list.
///
/// Writes only touch memory; [`persist_storage`] flushes the whole area.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalStorage {
    entries: BTreeMap<String, String>,
}

impl LocalStorage {
    pub fn get_item(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn set_item(&mut self, key: &str, value: impl Into<String>) {
        self.entries.insert(key.to_string(), value.into());
    }

    pub fn remove_item(&mut self, key: &str) {
        self.entries.remove(key);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Where the habit store reads its initial list and writes every change.
pub trait HabitPersistence {
    /// Missing or malformed data loads as an empty list.
    fn load(&self) -> Vec<Habit>;

    fn save(&mut self, habits: &[Habit]) -> Result<(), StorageError>;
}

impl HabitPersistence for LocalStorage {
    fn load(&self) -> Vec<Habit> {
        let Some(raw) = self.get_item(HABITS_KEY) else {
            return Vec::new();
        };

        match serde_json::from_str(raw) {
            Ok(habits) => habits,
            Err(err) => {
                debug!("ignoring malformed habits entry: {err}");
                Vec::new()
            }
        }
    }

    fn save(&mut self, habits: &[Habit]) -> Result<(), StorageError> {
        let payload = serde_json::to_string(habits).map_err(|source| StorageError::Serialize {
            key: HABITS_KEY,
            source,
        })?;
        self.set_item(HABITS_KEY, payload);
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryPersistence {
    pub habits: Vec<Habit>,
    pub saves: usize,
}

impl MemoryPersistence {
    pub fn with_habits(habits: Vec<Habit>) -> Self {
        Self { habits, saves: 0 }
    }
}

impl HabitPersistence for MemoryPersistence {
    fn load(&self) -> Vec<Habit> {
        self.habits.clone()
    }

    fn save(&mut self, habits: &[Habit]) -> Result<(), StorageError> {
        self.habits = habits.to_vec();
        self.saves += 1;
        Ok(())
    }
}

pub async fn load_storage(path: &Path) -> LocalStorage {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(storage) => storage,
            Err(err) => {
                error!("failed to parse storage file: {err}");
                LocalStorage::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => LocalStorage::default(),
        Err(err) => {
            error!("failed to read storage file: {err}");
            LocalStorage::default()
        }
    }
}

pub async fn persist_storage(path: &Path, storage: &LocalStorage) -> Result<(), StorageError> {
    let payload = serde_json::to_vec_pretty(storage).map_err(|source| StorageError::Serialize {
        key: "storage",
        source,
    })?;
    fs::write(path, payload)
        .await
        .map_err(|source| StorageError::Write {
            path: path.to_path_buf(),
            source,
        })
}
