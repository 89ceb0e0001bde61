//! Token store adapters
//!
//! - `FileTokenStore`: the token as plain text in one file, guarded by an
//!   advisory lock so two `rollcall` processes never see a half-written token
//! - `MemoryTokenStore`: process-local, for tests and embedding

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use fs2::FileExt;

use crate::domain::result::{Error, Result};
use crate::ports::TokenStore;

/// File name of the persisted token inside the data directory
pub const TOKEN_FILE_NAME: &str = "auth_token";

/// Token persisted to a file
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<dir>/auth_token`
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(TOKEN_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open_for_write(&self) -> std::io::Result<File> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut options = OpenOptions::new();
        options.read(true).write(true).create(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        options.open(&self.path)
    }
}

fn storage_error(action: &str, path: &Path, e: std::io::Error) -> Error {
    Error::storage(format!("Failed to {} {}: {}", action, path.display(), e))
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>> {
        let mut file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(storage_error("open", &self.path, e)),
        };

        file.lock_shared()
            .map_err(|e| storage_error("lock", &self.path, e))?;
        let mut content = String::new();
        let read = file.read_to_string(&mut content);
        let _ = file.unlock();
        read.map_err(|e| storage_error("read", &self.path, e))?;

        let token = content.trim();
        if token.is_empty() {
            Ok(None)
        } else {
            Ok(Some(token.to_string()))
        }
    }

    fn save(&self, token: &str) -> Result<()> {
        let mut file = self
            .open_for_write()
            .map_err(|e| storage_error("open", &self.path, e))?;

        file.lock_exclusive()
            .map_err(|e| storage_error("lock", &self.path, e))?;
        let written = file
            .set_len(0)
            .and_then(|_| file.seek(SeekFrom::Start(0)))
            .and_then(|_| file.write_all(token.as_bytes()))
            .and_then(|_| file.sync_all());
        let _ = file.unlock();

        written.map_err(|e| storage_error("write", &self.path, e))
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage_error("remove", &self.path, e)),
        }
    }
}

/// Token held in memory only
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Option<String>>> {
        self.token
            .lock()
            .map_err(|e| Error::storage(format!("Lock poisoned: {}", e)))
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.lock()?.clone())
    }

    fn save(&self, token: &str) -> Result<()> {
        *self.lock()? = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.lock()? = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_logged_out() {
        let dir = tempdir().unwrap();
        let store = FileTokenStore::in_dir(dir.path());
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_save_load_clear() {
        let dir = tempdir().unwrap();
        let store = FileTokenStore::in_dir(dir.path());

        store.save("first-token-that-is-long").unwrap();
        store.save("second").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("second"));

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
        assert!(!store.path().exists());

        // Clearing twice is fine
        store.clear().unwrap();
    }

    #[test]
    fn test_blank_file_is_logged_out() {
        let dir = tempdir().unwrap();
        let store = FileTokenStore::in_dir(dir.path());
        std::fs::write(store.path(), "  \n").unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_creates_missing_data_dir() {
        let dir = tempdir().unwrap();
        let store = FileTokenStore::in_dir(&dir.path().join("nested").join("rollcall"));
        store.save("tok").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("tok"));
    }

    #[cfg(unix)]
    #[test]
    fn test_token_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let store = FileTokenStore::in_dir(dir.path());
        store.save("tok").unwrap();
        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o077, 0);
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryTokenStore::with_token("abc");
        assert_eq!(store.load().unwrap().as_deref(), Some("abc"));
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
        store.save("def").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("def"));
    }
}
