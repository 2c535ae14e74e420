//! High score persistence.
//!
//! The engine persists exactly one thing: named integers (in practice the
//! single `"highscore"` record). Stores are last-write-wins with no
//! transactional guarantee. The session treats writes as fire-and-forget and
//! only logs failures.
//!
//! `JsonFileStore` keeps a flat JSON object of key → integer, the same shape
//! as a platform preferences file, and rewrites it on every write.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ShakeResult;

/// Durable key/value storage for integers.
pub trait HighscoreStore {
    /// Read `key`, falling back to `default` when absent or unreadable.
    fn read_int(&self, key: &str, default: i64) -> i64;

    /// Write `key`. Last write wins.
    fn write_int(&mut self, key: &str, value: i64) -> ShakeResult<()>;
}

/// In-memory store for tests and hosts that persist on their own.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, i64>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of writes performed so far.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl HighscoreStore for MemoryStore {
    fn read_int(&self, key: &str, default: i64) -> i64 {
        self.values.get(key).copied().unwrap_or(default)
    }

    fn write_int(&mut self, key: &str, value: i64) -> ShakeResult<()> {
        self.values.insert(key.to_string(), value);
        self.writes += 1;
        Ok(())
    }
}

/// File-backed store holding a flat JSON object.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, i64>,
}

impl JsonFileStore {
    /// Open a store at `path`. A missing file is an empty store; a corrupt
    /// one is an error so it is never silently overwritten.
    pub fn open<P: AsRef<Path>>(path: P) -> ShakeResult<Self> {
        let path = path.as_ref().to_path_buf();
        let values = match std::fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => BTreeMap::new(),
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        debug!(path = %path.display(), keys = values.len(), "opened highscore store");
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> ShakeResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(&self.values)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

impl HighscoreStore for JsonFileStore {
    fn read_int(&self, key: &str, default: i64) -> i64 {
        self.values.get(key).copied().unwrap_or(default)
    }

    fn write_int(&mut self, key: &str, value: i64) -> ShakeResult<()> {
        let previous = self.values.insert(key.to_string(), value);
        if let Err(e) = self.flush() {
            // Keep memory in step with what is on disk
            match previous {
                Some(old) => self.values.insert(key.to_string(), old),
                None => self.values.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }
}

impl<S: HighscoreStore + ?Sized> HighscoreStore for Box<S> {
    fn read_int(&self, key: &str, default: i64) -> i64 {
        (**self).read_int(key, default)
    }

    fn write_int(&mut self, key: &str, value: i64) -> ShakeResult<()> {
        (**self).write_int(key, value)
    }
}
