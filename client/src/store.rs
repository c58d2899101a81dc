//! Where the credential lives between runs.
//!
//! The router and the HTTP adapter both receive the store explicitly instead
//! of reaching for a global, so tests can swap in [`MemoryStore`].

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::{debug, info, warn};

use crate::error::StoreError;

/// Key under which the credential is persisted.
pub const CREDENTIAL_KEY: &str = "token";

pub trait SessionStore: Send + Sync + fmt::Debug {
    /// Raw stored credential, if any.
    fn load(&self) -> Result<Option<String>, StoreError>;

    fn save(&self, credential: &str) -> Result<(), StoreError>;

    /// Remove the credential. Clearing an empty store is not an error.
    fn clear(&self) -> Result<(), StoreError>;

    /// Infallible read used on navigation: a store that cannot be read is
    /// treated as holding nothing.
    fn credential(&self) -> Option<String> {
        match self.load() {
            Ok(credential) => credential.filter(|c| !c.trim().is_empty()),
            Err(e) => {
                warn!("Failed to read session store: {}", e);
                None
            }
        }
    }
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct MemoryStore {
    credential: RwLock<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credential(credential: impl Into<String>) -> Self {
        Self {
            credential: RwLock::new(Some(credential.into())),
        }
    }
}

impl SessionStore for MemoryStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        let guard = self.credential.read().unwrap_or_else(|e| e.into_inner());
        Ok(guard.clone())
    }

    fn save(&self, credential: &str) -> Result<(), StoreError> {
        let mut guard = self.credential.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(credential.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut guard = self.credential.write().unwrap_or_else(|e| e.into_inner());
        *guard = None;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// File-backed store
// ---------------------------------------------------------------------------

/// Persists `{"token": "<credential>"}` to a single JSON file.
///
/// Writes go through a sibling temp file and a rename so a crash never leaves
/// a half-written credential behind.
pub struct FileStore {
    path: PathBuf,
}

impl fmt::Debug for FileStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileStore").field("path", &self.path).finish()
    }
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "session.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SessionStore for FileStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No session file at {}", self.path.display());
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        if contents.trim().is_empty() {
            return Ok(None);
        }

        let mut entries: BTreeMap<String, String> = serde_json::from_str(&contents)?;
        Ok(entries.remove(CREDENTIAL_KEY))
    }

    fn save(&self, credential: &str) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let entries = BTreeMap::from([(CREDENTIAL_KEY, credential)]);
        let json = serde_json::to_string(&entries)?;

        let tmp = self.temp_path();
        fs::write(&tmp, json)?;
        restrict_permissions(&tmp)?;
        fs::rename(&tmp, &self.path)?;

        info!("Session saved to {}", self.path.display());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!("Session cleared at {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
