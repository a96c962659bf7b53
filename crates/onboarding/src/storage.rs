//! Durable credential storage
use crate::{error::StorageError, traits::CredentialStore};
use parking_lot::RwLock;
use passkey_primitives::{constants::credential::STORAGE_KEY, Credential};
use std::{collections::HashMap, fs, io::ErrorKind, path::PathBuf};
use tracing::debug;

/// Stores each key as a JSON file in a data directory
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    dir: PathBuf,
}

impl FileCredentialStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, key: &str) -> Result<PathBuf, StorageError> {
        if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(StorageError::Io(format!("invalid storage key {key:?}")));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path(key)?) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path(key)?;
        fs::create_dir_all(&self.dir)?;

        // replace atomically so readers never see a partial entry
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;

        debug!(path = %path.display(), "Stored {key}");
        Ok(())
    }
}

/// In-memory store, lost when dropped
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    entries: RwLock<HashMap<String, String>>,
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.write().insert(key.into(), value.into());
        Ok(())
    }
}

/// Loads the credential created by an earlier session. A `null` entry means no credential.
pub fn load_credential(store: &dyn CredentialStore) -> Result<Option<Credential>, StorageError> {
    let Some(value) = store.get(STORAGE_KEY)? else {
        return Ok(None);
    };

    serde_json::from_str::<Option<Credential>>(&value)
        .map_err(|err| StorageError::Corrupt { key: STORAGE_KEY.into(), inner: err.to_string() })
}

/// Persists the credential as `{"id": .., "publicKey": ..}`
pub fn save_credential(
    store: &dyn CredentialStore,
    credential: &Credential,
) -> Result<(), StorageError> {
    let value = serde_json::to_string(credential)
        .map_err(|err| StorageError::Corrupt { key: STORAGE_KEY.into(), inner: err.to_string() })?;
    store.set(STORAGE_KEY, &value)
}
