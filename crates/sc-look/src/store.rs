use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Key/value strings attached to an image file.
pub trait MetadataStore: Send + Sync {
    /// `Ok(None)` when the key has never been written.
    fn read(&self, image: &Path, key: &str) -> Result<Option<String>, StoreError>;
    fn write(&self, image: &Path, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Process-local store, mostly for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryMetadataStore {
    entries: Mutex<HashMap<(PathBuf, String), String>>,
}

impl MemoryMetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MetadataStore for MemoryMetadataStore {
    fn read(&self, image: &Path, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries
            .get(&(image.to_path_buf(), key.to_owned()))
            .cloned())
    }

    fn write(&self, image: &Path, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((image.to_path_buf(), key.to_owned()), value.to_owned());
        Ok(())
    }
}

const SIDECAR_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct SidecarFile {
    version: u32,
    #[serde(default)]
    entries: BTreeMap<String, String>,
}

impl Default for SidecarFile {
    fn default() -> Self {
        Self {
            version: SIDECAR_VERSION,
            entries: BTreeMap::new(),
        }
    }
}

/// Stores metadata as JSON next to the image: `look.png` -> `look.png.meta.json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SidecarMetadataStore;

impl SidecarMetadataStore {
    pub fn sidecar_path(image: &Path) -> PathBuf {
        let mut name = image.as_os_str().to_owned();
        name.push(".meta.json");
        PathBuf::from(name)
    }

    fn load(path: &Path) -> Result<Option<SidecarFile>, StoreError> {
        let bytes = match fs::read(path) {
            Ok(b) => b,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let file: SidecarFile =
            serde_json::from_slice(&bytes).map_err(|e| StoreError::Corrupt {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        if file.version != SIDECAR_VERSION {
            return Err(StoreError::Corrupt {
                path: path.to_path_buf(),
                reason: format!("unsupported version {}", file.version),
            });
        }
        Ok(Some(file))
    }
}

impl MetadataStore for SidecarMetadataStore {
    fn read(&self, image: &Path, key: &str) -> Result<Option<String>, StoreError> {
        let path = Self::sidecar_path(image);
        Ok(Self::load(&path)?.and_then(|mut f| f.entries.remove(key)))
    }

    /// Unreadable sidecars are replaced rather than merged into.
    fn write(&self, image: &Path, key: &str, value: &str) -> Result<(), StoreError> {
        let path = Self::sidecar_path(image);
        let mut file = match Self::load(&path) {
            Ok(existing) => existing.unwrap_or_default(),
            Err(StoreError::Corrupt { reason, .. }) => {
                warn!("replacing corrupt sidecar {}: {reason}", path.display());
                SidecarFile::default()
            }
            Err(e) => return Err(e),
        };
        file.entries.insert(key.to_owned(), value.to_owned());

        let bytes = serde_json::to_vec_pretty(&file).map_err(|e| StoreError::Corrupt {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        fs::write(&path, bytes).map_err(|source| StoreError::Io { path, source })
    }
}
