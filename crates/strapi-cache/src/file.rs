//! Filesystem cache.
//!
//! Each key lives in `<root>/<sha256(key)>.json` next to its expiry time.
//! Writers take an exclusive lock on `<root>/.lock`, readers a shared one,
//! so several processes can share one directory.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::{debug, instrument, trace};

use strapi_core::{Error, KeyValueCache, Result};

fn map_io(err: std::io::Error) -> Error {
    Error::unknown(format!("cache I/O error: {err}"))
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredEntry {
    key: String,
    expires_at: DateTime<Utc>,
    value: Value,
}

/// Cache persisted as JSON files under a directory.
#[derive(Debug, Clone)]
pub struct FileCache {
    root: PathBuf,
}

impl FileCache {
    /// Open (creating if needed) a cache rooted at `root`.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).map_err(map_io)?;
        Ok(Self { root })
    }

    /// Directory holding the entries.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        let digest = Sha256::digest(key.as_bytes());
        let name: String = digest.iter().map(|byte| format!("{byte:02x}")).collect();
        self.root.join(format!("{name}.json"))
    }

    fn lock(&self) -> Result<File> {
        OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(self.root.join(".lock"))
            .map_err(map_io)
    }

    fn read_entry(&self, path: &Path) -> Result<Option<StoredEntry>> {
        let lock = self.lock()?;
        lock.lock_shared().map_err(map_io)?;
        let contents = fs::read_to_string(path);
        lock.unlock().map_err(map_io)?;

        let contents = match contents {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(map_io(err)),
        };

        Ok(serde_json::from_str(&contents).ok())
    }

    fn write_entry(&self, path: &Path, entry: &StoredEntry) -> Result<()> {
        let line = serde_json::to_string(entry)?;
        let tmp = path.with_extension("tmp");

        let lock = self.lock()?;
        lock.lock_exclusive().map_err(map_io)?;
        let written = (|| -> std::io::Result<()> {
            let mut file = File::create(&tmp)?;
            file.write_all(line.as_bytes())?;
            file.sync_data()?;
            fs::rename(&tmp, path)
        })();
        lock.unlock().map_err(map_io)?;

        written.map_err(map_io)
    }

    fn remove_entry(&self, path: &Path) -> Result<()> {
        let lock = self.lock()?;
        lock.lock_exclusive().map_err(map_io)?;
        let removed = fs::remove_file(path);
        lock.unlock().map_err(map_io)?;

        match removed {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(map_io(err)),
        }
    }

    /// Delete every entry. Returns how many files were removed.
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub fn clear(&self) -> Result<usize> {
        let lock = self.lock()?;
        lock.lock_exclusive().map_err(map_io)?;

        let mut removed = 0;
        let result = (|| -> std::io::Result<()> {
            for dir_entry in fs::read_dir(&self.root)? {
                let path = dir_entry?.path();
                if path.extension().is_some_and(|ext| ext == "json") {
                    fs::remove_file(&path)?;
                    removed += 1;
                }
            }
            Ok(())
        })();
        lock.unlock().map_err(map_io)?;

        result.map_err(map_io)?;
        debug!(removed, "cache cleared");
        Ok(removed)
    }
}

#[async_trait]
impl KeyValueCache for FileCache {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let path = self.entry_path(key);
        let Some(entry) = self.read_entry(&path)? else {
            return Ok(None);
        };

        if entry.key != key || entry.expires_at <= Utc::now() {
            trace!(key, "cache entry expired");
            self.remove_entry(&path)?;
            return Ok(None);
        }

        trace!(key, "cache hit");
        Ok(Some(entry.value))
    }

    async fn put(&self, key: &str, value: Value, ttl: Duration) -> Result<()> {
        let path = self.entry_path(key);
        if ttl.is_zero() {
            return self.remove_entry(&path);
        }

        let ttl = chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX);
        let expires_at = Utc::now()
            .checked_add_signed(ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        self.write_entry(
            &path,
            &StoredEntry {
                key: key.to_string(),
                expires_at,
                value,
            },
        )
    }

    async fn forget(&self, key: &str) -> Result<()> {
        self.remove_entry(&self.entry_path(key))
    }
}
