use std::{
    collections::HashMap,
    fs, io,
    path::PathBuf,
    sync::Mutex,
};

use log::debug;
use thiserror::Error;

use crate::{error::Result, role::RoleCatalogue};

/// Storage key of the serialized custom-role mirror.
pub const CUSTOM_ROLES_KEY: &str = "customRoles";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid storage key {0:?}")]
    InvalidKey(String),

    #[error("storage lock was poisoned")]
    LockPoisoned,
}

/// String key-value store the game state is mirrored into.
pub trait Storage: Send + Sync {
    fn get_item(&self, key: &str) -> std::result::Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> std::result::Result<(), StorageError>;
}

/// Keeps every entry in its own file below `dir`.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStorage { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> std::result::Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> std::result::Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> std::result::Result<(), StorageError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir).map_err(|source| StorageError::Io {
            path: self.dir.clone(),
            source,
        })?;
        fs::write(&path, value).map_err(|source| StorageError::Io { path, source })
    }
}

#[derive(Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> std::result::Result<Option<String>, StorageError> {
        let items = self.items.lock().map_err(|_| StorageError::LockPoisoned)?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> std::result::Result<(), StorageError> {
        let mut items = self.items.lock().map_err(|_| StorageError::LockPoisoned)?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

pub fn load_custom_roles(storage: &dyn Storage) -> Result<RoleCatalogue> {
    match storage.get_item(CUSTOM_ROLES_KEY)? {
        Some(json) => Ok(serde_json::from_str(&json)?),
        None => Ok(RoleCatalogue::new()),
    }
}

pub fn save_custom_roles(storage: &dyn Storage, roles: &RoleCatalogue) -> Result<()> {
    let json = serde_json::to_string(roles)?;
    storage.set_item(CUSTOM_ROLES_KEY, &json)?;
    debug!("Saved {} custom roles", roles.len());
    Ok(())
}
