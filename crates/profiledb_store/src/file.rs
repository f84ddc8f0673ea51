//! File-based store for persistent storage.

use crate::error::{StoreError, StoreResult};
use crate::store::ProfileStore;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

const RECORD_EXT: &str = "rec";

/// A file-backed record store.
///
/// Each identity is stored as one file under the store root. Records
/// survive process restarts.
///
/// # Durability and atomicity
///
/// A `put` writes the new record to a temporary file, fsyncs it, and
/// renames it over the old one. Renames are atomic on the supported
/// platforms, so a concurrent `get` observes either the complete old
/// record or the complete new one, never a mix.
///
/// # Concurrency
///
/// Writers to the same identity serialize on a per-identity mutex;
/// writers to distinct identities proceed in parallel.
///
/// # Identity names
///
/// Identities arrive in requests, not only from the server's own
/// minting, so they are checked against a filename-safe alphabet
/// (ASCII alphanumerics, `-`, `_`) before touching the filesystem.
/// An ill-formed identity reads as absent and is refused as a write
/// target; it can never name a path outside the store root.
#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
    write_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

/// True iff `identity` is safe to use as a record file name.
fn valid_identity(identity: &str) -> bool {
    !identity.is_empty()
        && identity
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

impl FileStore {
    /// Opens a store rooted at `root`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            write_locks: Mutex::new(HashMap::new()),
        })
    }

    /// Returns the store root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn record_path(&self, identity: &str) -> PathBuf {
        self.root.join(format!("{identity}.{RECORD_EXT}"))
    }

    fn write_lock(&self, identity: &str) -> Arc<Mutex<()>> {
        let mut locks = self.write_locks.lock();
        Arc::clone(
            locks
                .entry(identity.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(()))),
        )
    }
}

impl ProfileStore for FileStore {
    fn get(&self, identity: &str) -> StoreResult<Option<Vec<u8>>> {
        if !valid_identity(identity) {
            return Ok(None);
        }
        match fs::read(self.record_path(identity)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StoreError::Unavailable(err)),
        }
    }

    fn put(&self, identity: &str, record: &[u8]) -> StoreResult<()> {
        if !valid_identity(identity) {
            return Err(StoreError::InvalidIdentity(identity.to_string()));
        }
        let lock = self.write_lock(identity);
        let _guard = lock.lock();

        let final_path = self.record_path(identity);
        let tmp_path = self.root.join(format!("{identity}.{RECORD_EXT}.tmp"));

        let mut tmp = File::create(&tmp_path)?;
        tmp.write_all(record)?;
        tmp.sync_all()?;
        drop(tmp);

        fs::rename(&tmp_path, &final_path)?;
        Ok(())
    }

    fn contains(&self, identity: &str) -> StoreResult<bool> {
        Ok(valid_identity(identity) && self.record_path(identity).exists())
    }

    fn len(&self) -> StoreResult<usize> {
        let mut count = 0;
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) == Some(RECORD_EXT) {
                count += 1;
            }
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    #[test]
    fn open_creates_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("records");
        let store = FileStore::open(&root).unwrap();
        assert!(root.is_dir());
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = FileStore::open(dir.path()).unwrap();
            store.put("a", b"persisted").unwrap();
        }
        let store = FileStore::open(dir.path()).unwrap();
        assert_eq!(store.get("a").unwrap().unwrap(), b"persisted");
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn put_replaces_full_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        store.put("a", b"a long first revision").unwrap();
        store.put("a", b"x").unwrap();
        assert_eq!(store.get("a").unwrap().unwrap(), b"x");
    }

    #[test]
    fn missing_record_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        assert_eq!(store.get("nothing").unwrap(), None);
        assert!(!store.contains("nothing").unwrap());
    }

    #[test]
    fn traversal_identity_cannot_read_outside_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("records");
        let store = FileStore::open(&root).unwrap();

        // A file one level above the store root must stay invisible.
        fs::write(dir.path().join("outside.rec"), b"secret").unwrap();
        assert_eq!(store.get("../outside").unwrap(), None);
        assert!(!store.contains("../outside").unwrap());
        assert_eq!(store.get("..").unwrap(), None);
        assert_eq!(store.get("a/b").unwrap(), None);
        assert_eq!(store.get("").unwrap(), None);
    }

    #[test]
    fn traversal_identity_cannot_write_outside_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("records");
        let store = FileStore::open(&root).unwrap();

        let err = store.put("../planted", b"payload").unwrap_err();
        assert!(matches!(err, StoreError::InvalidIdentity(_)));
        assert!(!dir.path().join("planted.rec").exists());

        assert!(store.put("a\\b", b"payload").is_err());
        assert!(store.put("", b"payload").is_err());
        assert_eq!(store.len().unwrap(), 0);
    }

    #[test]
    fn minted_identity_shapes_are_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        // 32-hex uuid simple form plus the wider alphanumeric/-/_ set.
        for id in ["3f2a77d0c0e94b1c8d3e9a4f5b6c7d8e", "abc-123", "A_b9"] {
            store.put(id, b"{}").unwrap();
            assert_eq!(store.get(id).unwrap().unwrap(), b"{}");
        }
    }

    #[test]
    fn len_ignores_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        store.put("a", b"1").unwrap();
        fs::write(dir.path().join("b.rec.tmp"), b"partial").unwrap();
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn concurrent_same_identity_writes_never_mix() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FileStore::open(dir.path()).unwrap());
        let a = vec![b'a'; 8192];
        let b = vec![b'b'; 8192];

        let handles: Vec<_> = [a.clone(), b.clone()]
            .into_iter()
            .map(|record| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for _ in 0..20 {
                        store.put("contested", &record).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let stored = store.get("contested").unwrap().unwrap();
        assert!(stored == a || stored == b);
    }

    #[test]
    fn distinct_identities_do_not_block() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FileStore::open(dir.path()).unwrap());

        // Hold the write lock for one identity, then write another.
        let blocker = store.write_lock("held");
        let guard = blocker.lock();

        let other = Arc::clone(&store);
        let start = Instant::now();
        let handle = std::thread::spawn(move || {
            other.put("free", b"through").unwrap();
        });
        handle.join().unwrap();
        assert!(start.elapsed() < Duration::from_secs(1));

        drop(guard);
        assert_eq!(store.get("free").unwrap().unwrap(), b"through");
    }
}
