use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use narthex_types::KeyId;
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use crate::traits::KeyStore;

/// Longest record name accepted as a single path component.
pub const MAX_RECORD_NAME_LEN: usize = 255;

/// Configuration for [`FsKeyStore`].
#[derive(Clone, Debug)]
pub struct FsStoreConfig {
    /// `fsync` each record before reporting it as created.
    pub sync_on_write: bool,
    /// Unix permission bits for new records. Group and other bits should
    /// stay clear since records hold key material.
    pub file_mode: u32,
}

impl Default for FsStoreConfig {
    fn default() -> Self {
        Self {
            sync_on_write: true,
            file_mode: 0o600,
        }
    }
}

/// Flat directory of Key Records.
///
/// Every record lives directly under `root` as `0x<hex>.key`. The only
/// synchronisation between concurrent registrations, in this process or
/// any other sharing the directory, is the `O_CREAT | O_EXCL` open.
pub struct FsKeyStore {
    root: PathBuf,
    config: FsStoreConfig,
}

impl FsKeyStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        Self::with_config(root, FsStoreConfig::default())
    }

    pub fn with_config(root: impl Into<PathBuf>, config: FsStoreConfig) -> StoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root, config })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &FsStoreConfig {
        &self.config
    }

    /// Full path of the record for `id`. Fails without touching the
    /// filesystem if the name would not fit in a path component.
    pub fn record_path(&self, id: KeyId) -> StoreResult<PathBuf> {
        let name = id.record_name();
        if name.len() > MAX_RECORD_NAME_LEN {
            return Err(StoreError::NameTooLong {
                id,
                max: MAX_RECORD_NAME_LEN,
            });
        }
        Ok(self.root.join(name))
    }

    fn create_exclusive(&self, path: &Path) -> io::Result<File> {
        let mut options = OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(self.config.file_mode);
        }
        options.open(path)
    }

    fn write_record(&self, file: &mut File, body: &[u8], body_length: usize) -> StoreResult<()> {
        fill_record(file, body, body_length)?;
        if self.config.sync_on_write {
            file.sync_all()?;
        }
        Ok(())
    }

    fn discard(path: &Path) {
        if let Err(e) = fs::remove_file(path) {
            warn!(path = %path.display(), error = %e, "failed to remove partial key record");
        }
    }
}

/// Write exactly `body_length` bytes of `body` into `sink`.
///
/// A body shorter than `body_length` is written as far as it goes and then
/// reported as a short write, so the caller can discard the sink.
fn fill_record<W: Write>(sink: &mut W, body: &[u8], body_length: usize) -> StoreResult<()> {
    let available = body.len().min(body_length);
    sink.write_all(&body[..available])?;
    sink.flush()?;
    if available != body_length {
        return Err(StoreError::ShortWrite {
            expected: body_length,
            written: available,
        });
    }
    Ok(())
}

impl KeyStore for FsKeyStore {
    fn register(&self, id: KeyId, body: &[u8], body_length: usize) -> StoreResult<()> {
        let path = self.record_path(id)?;

        let mut file = match self.create_exclusive(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(StoreError::AlreadyRegistered(id));
            }
            Err(source) => return Err(StoreError::Create { path, source }),
        };

        if let Err(e) = self.write_record(&mut file, body, body_length) {
            drop(file);
            Self::discard(&path);
            return Err(match e {
                StoreError::Io(source) => StoreError::Write { path, source },
                other => other,
            });
        }

        debug!(key = %id, path = %path.display(), bytes = body_length, "key record written");
        Ok(())
    }

    fn load(&self, id: KeyId) -> StoreResult<Option<Vec<u8>>> {
        let path = self.record_path(id)?;
        match fs::read(&path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn contains(&self, id: KeyId) -> StoreResult<bool> {
        let path = self.record_path(id)?;
        Ok(path.try_exists()?)
    }

    fn list(&self) -> StoreResult<Vec<KeyId>> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Some(id) = entry.file_name().to_str().and_then(KeyId::from_record_name) {
                ids.push(id);
            }
        }
        ids.sort();
        Ok(ids)
    }
}

impl std::fmt::Debug for FsKeyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FsKeyStore")
            .field("root", &self.root)
            .field("sync_on_write", &self.config.sync_on_write)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Barrier};
    use std::thread;

    fn temp_store() -> (tempfile::TempDir, FsKeyStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FsKeyStore::open(dir.path()).unwrap();
        (dir, store)
    }

    /// Accepts `limit` bytes and then fails every write.
    struct FailingWriter {
        written: Vec<u8>,
        limit: usize,
    }

    impl Write for FailingWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let room = self.limit - self.written.len();
            if room == 0 {
                return Err(io::Error::other("device full"));
            }
            let n = room.min(buf.len());
            self.written.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn register_creates_record() {
        let (dir, store) = temp_store();
        store.register(KeyId::new(0x2a), b"abc", 3).unwrap();

        let data = fs::read(dir.path().join("0x2a.key")).unwrap();
        assert_eq!(data, b"abc");
    }

    #[test]
    fn second_register_conflicts_and_keeps_original() {
        let (dir, store) = temp_store();
        let id = KeyId::new(0x2a);
        store.register(id, b"abc", 3).unwrap();

        let err = store.register(id, b"something else", 14).unwrap_err();
        assert!(matches!(err, StoreError::AlreadyRegistered(got) if got == id));
        assert_eq!(fs::read(dir.path().join("0x2a.key")).unwrap(), b"abc");
    }

    #[test]
    fn short_body_leaves_no_record() {
        let (dir, store) = temp_store();
        let id = KeyId::new(0x10);

        let err = store.register(id, b"ab", 4).unwrap_err();
        assert!(matches!(err, StoreError::ShortWrite { expected: 4, written: 2 }));
        assert!(!dir.path().join("0x10.key").exists());

        // The slot is still free after a failed attempt.
        store.register(id, b"abcd", 4).unwrap();
        assert_eq!(store.load(id).unwrap().unwrap(), b"abcd");
    }

    #[test]
    fn writes_exactly_body_length_bytes() {
        let (_dir, store) = temp_store();
        let id = KeyId::new(0x11);
        store.register(id, b"abcdef", 3).unwrap();
        assert_eq!(store.load(id).unwrap().unwrap(), b"abc");
    }

    #[test]
    fn fill_record_reports_io_failure() {
        let mut sink = FailingWriter { written: Vec::new(), limit: 2 };
        let err = fill_record(&mut sink, b"abcd", 4).unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));
        assert_eq!(sink.written, b"ab");
    }

    #[test]
    fn fill_record_rejects_zero_transfer() {
        let mut sink = FailingWriter { written: Vec::new(), limit: 0 };
        assert!(fill_record(&mut sink, b"abcd", 4).is_err());
    }

    #[test]
    fn fill_record_accepts_empty_body() {
        let mut sink = FailingWriter { written: Vec::new(), limit: 0 };
        fill_record(&mut sink, b"", 0).unwrap();
    }

    #[test]
    fn create_failure_is_not_a_conflict() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsKeyStore::open(dir.path().join("store")).unwrap();
        fs::remove_dir(store.root()).unwrap();

        let err = store.register(KeyId::new(0x2a), b"abc", 3).unwrap_err();
        assert!(matches!(err, StoreError::Create { .. }));
        assert_eq!(err.outcome(), narthex_types::RegistrationOutcome::InternalError);
    }

    #[test]
    fn open_creates_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("nested").join("keys");
        let store = FsKeyStore::open(&root).unwrap();
        assert!(root.is_dir());
        assert_eq!(store.root(), root.as_path());
    }

    #[test]
    fn load_missing_is_none() {
        let (_dir, store) = temp_store();
        assert!(store.load(KeyId::new(7)).unwrap().is_none());
        assert!(!store.contains(KeyId::new(7)).unwrap());
    }

    #[test]
    fn binary_body_round_trips() {
        let (_dir, store) = temp_store();
        let body: Vec<u8> = (0..=255u8).collect();
        let id = KeyId::new(u32::MAX);
        store.register(id, &body, body.len()).unwrap();
        assert!(store.contains(id).unwrap());
        assert_eq!(store.load(id).unwrap().unwrap(), body);
    }

    #[test]
    fn list_ignores_foreign_files() {
        let (dir, store) = temp_store();
        store.register(KeyId::new(0xff), b"b", 1).unwrap();
        store.register(KeyId::new(0x01), b"a", 1).unwrap();
        fs::write(dir.path().join("README"), b"x").unwrap();
        fs::write(dir.path().join("0x0002.key"), b"x").unwrap();
        fs::create_dir(dir.path().join("0x3.key")).unwrap();

        assert_eq!(store.list().unwrap(), vec![KeyId::new(0x01), KeyId::new(0xff)]);
    }

    #[cfg(unix)]
    #[test]
    fn record_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let (dir, store) = temp_store();
        store.register(KeyId::new(0x2a), b"abc", 3).unwrap();
        let mode = fs::metadata(dir.path().join("0x2a.key")).unwrap().permissions().mode();
        assert_eq!(mode & 0o077, 0);
    }

    #[test]
    fn without_sync() {
        let dir = tempfile::tempdir().unwrap();
        let config = FsStoreConfig { sync_on_write: false, ..FsStoreConfig::default() };
        let store = FsKeyStore::with_config(dir.path(), config).unwrap();
        store.register(KeyId::new(1), b"k", 1).unwrap();
        assert_eq!(store.load(KeyId::new(1)).unwrap().unwrap(), b"k");
    }

    #[test]
    fn concurrent_registration_has_one_winner() {
        const ATTEMPTS: usize = 16;
        let (dir, store) = temp_store();
        let store = Arc::new(store);
        let barrier = Arc::new(Barrier::new(ATTEMPTS));
        let id = KeyId::new(0xc0ffee);

        let handles: Vec<_> = (0..ATTEMPTS)
            .map(|i| {
                let store = Arc::clone(&store);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    let body = vec![i as u8; 64];
                    barrier.wait();
                    store.register(id, &body, body.len())
                })
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let created = results.iter().filter(|r| r.is_ok()).count();
        let conflicts = results
            .iter()
            .filter(|r| matches!(r, Err(StoreError::AlreadyRegistered(_))))
            .count();
        assert_eq!(created, 1);
        assert_eq!(conflicts, ATTEMPTS - 1);

        let data = fs::read(dir.path().join("0xc0ffee.key")).unwrap();
        assert_eq!(data.len(), 64);
        assert!(data.iter().all(|b| *b == data[0]));
        assert_eq!(store.list().unwrap(), vec![id]);
    }
}
