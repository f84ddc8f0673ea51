//! On-disk identity cache.
//!
//! The identity token is the only piece of client state that must
//! survive restarts: without it the client cannot find its record
//! again. It is stored as a single plain-text file inside the
//! configured cache directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const IDENTITY_FILE: &str = "identity";

/// Persists the bound identity token across runs.
#[derive(Debug, Clone)]
pub struct IdentityCache {
    dir: PathBuf,
}

impl IdentityCache {
    /// Opens a cache rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Returns the cache directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Loads the cached identity, if one was saved.
    ///
    /// # Errors
    ///
    /// Returns an error for I/O failures other than the file being
    /// absent.
    pub fn load(&self) -> io::Result<Option<String>> {
        match fs::read_to_string(self.dir.join(IDENTITY_FILE)) {
            Ok(raw) => {
                let token = raw.trim().to_string();
                Ok(if token.is_empty() { None } else { Some(token) })
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Saves an identity, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, identity: &str) -> io::Result<()> {
        // Write-then-rename so a crash mid-write cannot truncate a
        // previously saved identity.
        let tmp = self.dir.join(format!("{IDENTITY_FILE}.tmp"));
        fs::write(&tmp, identity)?;
        fs::rename(&tmp, self.dir.join(IDENTITY_FILE))
    }

    /// Removes the cached identity, if any.
    ///
    /// # Errors
    ///
    /// Returns an error for I/O failures other than the file being
    /// absent.
    pub fn clear(&self) -> io::Result<()> {
        match fs::remove_file(self.dir.join(IDENTITY_FILE)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}
