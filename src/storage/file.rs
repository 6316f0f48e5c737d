//! File-backed store: one file per key inside a directory
//!
//! Writes go to a temporary sibling first and are renamed into place, so a
//! crash mid-write leaves the previous value intact. A lock file held with
//! `fs2` serializes writers from separate processes sharing the directory.

use super::KeyValueStore;
use crate::core::{LoggerError, Result};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

const LOCK_FILE_NAME: &str = ".store.lock";

#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| {
            LoggerError::storage(
                dir.display().to_string(),
                format!("Failed to create store directory: {}", e),
            )
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
            && !key.starts_with('.');
        if !valid {
            return Err(LoggerError::storage(key, "Key contains unsupported characters"));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }

    fn lock(&self) -> Result<File> {
        let lock_path = self.dir.join(LOCK_FILE_NAME);
        let lock_file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)?;
        lock_file
            .lock_exclusive()
            .map_err(|e| LoggerError::storage(LOCK_FILE_NAME, format!("Failed to lock store: {}", e)))?;
        Ok(lock_file)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(LoggerError::storage(key, e.to_string())),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        let temp_path = path.with_extension("json.tmp");
        let lock = self.lock()?;

        let write_result = (|| -> std::io::Result<()> {
            let mut temp = File::create(&temp_path)?;
            temp.write_all(value.as_bytes())?;
            temp.sync_all()?;
            fs::rename(&temp_path, &path)
        })();

        let _ = FileExt::unlock(&lock);

        write_result.map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            LoggerError::storage(key, format!("Failed to write value: {}", e))
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        let lock = self.lock()?;
        let result = match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(LoggerError::storage(key, e.to_string())),
        };
        let _ = FileExt::unlock(&lock);
        result
    }
}
