//! Key/value persistence adapter.
//!
//! Every collection is stored as one JSON document under its own key. Read,
//! write and parse failures are logged and treated as "nothing persisted".

pub mod error;
pub mod file;
pub mod memory;

pub use error::*;
pub use file::DirectoryStore;
pub use memory::MemoryStore;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

/// Storage keys, one per persisted collection.
pub mod keys {
    pub const APP_STATE: &str = "wft_app_state_v1";
    pub const USERS: &str = "wft_admin_users";
    pub const TRUCKS: &str = "wft_admin_trucks";
    pub const SCHEDULE: &str = "wft_schedule_config";
}

/// A string-keyed store of string values.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Failure-tolerant JSON layer over a [`KeyValueStore`].
#[derive(Clone)]
pub struct Persistence {
    store: Arc<dyn KeyValueStore>,
}

impl Persistence {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::default()))
    }

    /// Raw JSON document under `key`, or `None` when absent or unreadable.
    pub fn load_value(&self, key: &str) -> Option<serde_json::Value> {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key, "Nothing persisted");
                return None;
            }
            Err(e) => {
                warn!(key, error = %e, "Storage read failed");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "Persisted document is not valid JSON");
                None
            }
        }
    }

    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.load_value(key)?;
        match serde_json::from_value(value) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!(key, error = %e, "Persisted document has an unexpected shape");
                None
            }
        }
    }

    /// Best-effort write. Errors are logged and dropped.
    pub fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        if let Err(e) = self.try_save(key, value) {
            warn!(key, error = %e, "Storage write failed");
        }
    }

    fn try_save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value)?;
        self.store.set(key, &raw)?;
        debug!(key, bytes = raw.len(), "Persisted");
        Ok(())
    }
}
