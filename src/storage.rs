use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;
use tracing::warn;

/// Key holding the JSON array of locally created (or locally mutated) polls.
pub const POLLS_KEY: &str = "polls";
/// Key holding the current session's user record, if signed in.
pub const SESSION_KEY: &str = "user";

/// Key holding a voter's append-only list of vote records.
pub fn votes_key(voter_id: &str) -> String {
    format!("user_votes_{voter_id}")
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("failed to encode value for key {key}: {source}")]
    Encode {
        key: String,
        source: serde_json::Error,
    },
}

/// The persistence boundary: a durable string-keyed store with synchronous
/// get/set/remove. Single-process, no transactions. Everything above this
/// trait reads and writes JSON values through [`read_json`] and
/// [`write_json`], so a fake store is all a test needs.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// HashMap-backed store. The in-memory fake for tests, also usable as a real
/// store for ephemeral sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Reads and decodes a stored JSON value. An absent key yields the type's
/// default. A value that fails to decode is treated as absent: the corrupt
/// key is cleared, a warning is logged, and the default is returned — store
/// corruption must never surface as a fatal error.
pub fn read_json<S, T>(store: &mut S, key: &str) -> Result<T, StoreError>
where
    S: KeyValueStore + ?Sized,
    T: DeserializeOwned + Default,
{
    let Some(raw) = store.get(key)? else {
        return Ok(T::default());
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(value),
        Err(err) => {
            warn!(key, %err, "clearing corrupt stored value");
            store.remove(key)?;
            Ok(T::default())
        }
    }
}

/// Encodes a value as JSON and writes it under `key`.
pub fn write_json<S, T>(store: &mut S, key: &str, value: &T) -> Result<(), StoreError>
where
    S: KeyValueStore + ?Sized,
    T: Serialize,
{
    let raw = serde_json::to_string(value).map_err(|source| StoreError::Encode {
        key: key.to_string(),
        source,
    })?;
    store.set(key, raw)
}
