//! Bearer token persistence across process restarts.
//!
//! [`KeyringTokenStore`] keeps the token in the OS keychain and falls back to
//! a `0600` credentials file; [`FileTokenStore`] uses only the file;
//! [`MemoryTokenStore`] keeps nothing beyond the process.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::error::ApiError;

const KEYRING_USER: &str = "bearer-token";

/// Where the session reads and writes its token.
pub trait TokenStore: Send + Sync {
    /// The persisted token, if any. Empty values count as absent.
    fn load(&self) -> Option<String>;

    /// # Errors
    ///
    /// Returns [`ApiError::TokenStore`] if the token cannot be persisted.
    fn store(&self, token: &str) -> Result<(), ApiError>;

    /// # Errors
    ///
    /// Returns [`ApiError::TokenStore`] if a persisted token cannot be removed.
    fn clear(&self) -> Result<(), ApiError>;

    /// Short name of the backing medium, for status display.
    fn source(&self) -> &'static str;
}

// --- Memory ---

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `token`, as if left by an earlier run.
    #[must_use]
    pub fn holding(token: &str) -> Self {
        Self {
            token: Mutex::new(Some(token.to_string())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        self.token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .filter(|token| !token.is_empty())
    }

    fn store(&self, token: &str) -> Result<(), ApiError> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), ApiError> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }

    fn source(&self) -> &'static str {
        "memory"
    }
}

// --- File ---

#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Option<String> {
        fs::read_to_string(&self.path)
            .ok()
            .map(|content| content.trim().to_string())
            .filter(|token| !token.is_empty())
    }

    fn store(&self, token: &str) -> Result<(), ApiError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ApiError::TokenStore(format!("mkdir {}: {e}", parent.display()))
            })?;
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                if let Err(e) = fs::set_permissions(parent, fs::Permissions::from_mode(0o700)) {
                    tracing::warn!("failed to chmod 0700 {}: {e}", parent.display());
                }
            }
        }
        fs::write(&self.path, token)
            .map_err(|e| ApiError::TokenStore(format!("write {}: {e}", self.path.display())))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600)).map_err(|e| {
                ApiError::TokenStore(format!("chmod {}: {e}", self.path.display()))
            })?;
        }

        Ok(())
    }

    fn clear(&self) -> Result<(), ApiError> {
        if self.path.exists() {
            fs::remove_file(&self.path).map_err(|e| {
                ApiError::TokenStore(format!("failed to delete {}: {e}", self.path.display()))
            })?;
        }
        Ok(())
    }

    fn source(&self) -> &'static str {
        "file"
    }
}

// --- Keyring ---

/// OS keychain storage with a credentials-file fallback.
///
/// At most one tier holds the token: a write that lands in the file also
/// removes any older keychain copy, so [`load`](TokenStore::load) never
/// prefers a stale token.
#[derive(Debug)]
pub struct KeyringTokenStore {
    entry: Option<keyring::Entry>,
    fallback: FileTokenStore,
}

impl KeyringTokenStore {
    #[must_use]
    pub fn new(service: &str, fallback: FileTokenStore) -> Self {
        let entry = keyring::Entry::new(service, KEYRING_USER)
            .inspect_err(|error| tracing::warn!(%error, "keyring unavailable; using file only"))
            .ok();
        Self { entry, fallback }
    }

    fn forget_keyring_copy(entry: &keyring::Entry) {
        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => {}
            Err(error) => tracing::warn!(%error, "failed to delete keyring token"),
        }
    }
}

impl TokenStore for KeyringTokenStore {
    fn load(&self) -> Option<String> {
        if let Some(entry) = &self.entry
            && let Ok(token) = entry.get_password()
            && !token.is_empty()
        {
            return Some(token);
        }
        self.fallback.load()
    }

    fn store(&self, token: &str) -> Result<(), ApiError> {
        let Some(entry) = &self.entry else {
            return self.fallback.store(token);
        };
        match entry.set_password(token) {
            Ok(()) => Ok(()),
            Err(error) => {
                tracing::warn!(%error, "keyring store failed; falling back to file");
                Self::forget_keyring_copy(entry);
                self.fallback.store(token)
            }
        }
    }

    fn clear(&self) -> Result<(), ApiError> {
        if let Some(entry) = &self.entry {
            Self::forget_keyring_copy(entry);
        }
        self.fallback.clear()
    }

    fn source(&self) -> &'static str {
        "keyring"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_cycle() {
        let store = MemoryTokenStore::new();
        assert!(store.load().is_none());
        store.store("abc123").unwrap();
        assert_eq!(store.load().as_deref(), Some("abc123"));
        store.clear().unwrap();
        assert!(store.load().is_none());
    }

    #[test]
    fn file_store_load_clear_cycle() {
        let tmp = tempfile::TempDir::new().expect("tmp dir");
        let store = FileTokenStore::new(tmp.path().join("nested").join("credentials"));

        store.store("abc123").expect("store");
        assert_eq!(store.load().as_deref(), Some("abc123"));

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(store.path())
                .expect("metadata")
                .permissions()
                .mode()
                & 0o777;
            assert_eq!(mode, 0o600, "credentials file should be 0600");
        }

        store.clear().expect("clear");
        assert!(!store.path().exists());
        assert!(store.load().is_none());
    }

    #[test]
    fn file_store_ignores_whitespace_only_content() {
        let tmp = tempfile::TempDir::new().expect("tmp dir");
        let store = FileTokenStore::new(tmp.path().join("credentials"));
        std::fs::write(store.path(), "   \n  ").expect("write");
        assert!(store.load().is_none());
    }

    fn mock_keyring_store(dir: &tempfile::TempDir) -> KeyringTokenStore {
        keyring::set_default_credential_builder(keyring::mock::default_credential_builder());
        KeyringTokenStore::new("korpus-test", FileTokenStore::new(dir.path().join("credentials")))
    }

    fn fail_next_keyring_call(store: &KeyringTokenStore) {
        store
            .entry
            .as_ref()
            .expect("mock entry")
            .get_credential()
            .downcast_ref::<keyring::mock::MockCredential>()
            .expect("mock credential")
            .set_error(keyring::Error::NoStorageAccess("locked".into()));
    }

    #[test]
    fn keyring_store_prefers_keychain() {
        let tmp = tempfile::TempDir::new().expect("tmp dir");
        let store = mock_keyring_store(&tmp);

        store.store("abc123").expect("store");
        assert_eq!(store.load().as_deref(), Some("abc123"));
        assert!(store.fallback.load().is_none());

        store.clear().expect("clear");
        assert!(store.load().is_none());
    }

    #[test]
    fn file_fallback_drops_older_keychain_token() {
        let tmp = tempfile::TempDir::new().expect("tmp dir");
        let store = mock_keyring_store(&tmp);
        store.store("old").expect("keyring store");

        fail_next_keyring_call(&store);
        store.store("new").expect("file fallback");

        assert_eq!(store.fallback.load().as_deref(), Some("new"));
        assert_eq!(store.load().as_deref(), Some("new"));
    }

    #[test]
    fn clear_survives_keychain_failure() {
        let tmp = tempfile::TempDir::new().expect("tmp dir");
        let store = mock_keyring_store(&tmp);
        store.fallback.store("abc123").expect("file store");

        fail_next_keyring_call(&store);
        store.clear().expect("clear");

        assert!(store.load().is_none());
    }

    #[test]
    fn clearing_missing_file_is_ok() {
        let tmp = tempfile::TempDir::new().expect("tmp dir");
        let store = FileTokenStore::new(tmp.path().join("never-written"));
        assert!(store.clear().is_ok());
    }
}
