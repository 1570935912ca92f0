//! Single-slot plain-text records.
//!
//! Each record holds exactly one value that is overwritten on every save;
//! there is no history and no isolation between callers. Stores talk to a
//! `RecordSlot` so the backing location can be swapped without touching
//! the parsing/formatting logic.

pub mod coordinates;
pub mod pv_config;

use std::io;
use std::path::PathBuf;

/// Backing storage for a single overwrite-only text record.
pub trait RecordSlot: Send + Sync {
    /// Replace the record with `contents`.
    fn write(&self, contents: &str) -> io::Result<()>;
    /// Current record contents, or `None` when nothing has been written.
    fn read(&self) -> io::Result<Option<String>>;
    fn exists(&self) -> bool;
}

/// A record stored as a whole file on disk.
#[derive(Debug, Clone)]
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecordSlot for FileSlot {
    fn write(&self, contents: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, contents)
    }

    fn read(&self) -> io::Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn exists(&self) -> bool {
        self.path.exists()
    }
}
