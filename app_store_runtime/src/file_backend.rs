//! File-backed persistence: one `<key>.json` per record.
//!
//! Writes go to `<key>.json.tmp`, are fsynced, then renamed over the
//! previous record, so a crash mid-write leaves the old record intact.
//! The directory is created on first write.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use app_store_kernel::{PersistenceBackend, PersistenceError};

#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the record file for `key`.
    pub fn record_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    fn write_atomically(&self, key: &str, document: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;

        let path = self.record_path(key);
        let tmp = self.dir.join(format!("{}.json.tmp", key));
        {
            let mut file = File::create(&tmp)?;
            file.write_all(document.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &path)
    }
}

impl PersistenceBackend for FileBackend {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let path = self.record_path(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PersistenceError::Read(format!(
                "{}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn set(&mut self, key: &str, document: &str) -> Result<(), PersistenceError> {
        self.write_atomically(key, document).map_err(|e| {
            PersistenceError::Write(format!("{}: {}", self.record_path(key).display(), e))
        })
    }
}
