//! Persistent parent cache.
//!
//! Cached lookups survive across processes in a sled database. Keys and
//! values are bincode-encoded [`CacheKey`] and [`CachedParents`] values.

use crate::cache::{CacheKey, CachedParents, ParentCache};
use c1_core::{EntityToken, SearchKind};
use sled::Db;
use std::path::Path;
use thiserror::Error;
use tracing::{trace, warn};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Sled(#[from] sled::Error),
    #[error("Serialization error: {0}")]
    Bincode(#[from] bincode::Error),
}

/// A [`ParentCache`] stored on disk.
pub struct SledParentCache {
    db: Db,
}

impl SledParentCache {
    /// Opens or creates a cache at the specified path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let db = sled::open(path)?;
        Ok(Self { db })
    }

    /// Returns the number of cached entries.
    pub fn len(&self) -> usize {
        self.db.len()
    }

    pub fn is_empty(&self) -> bool {
        self.db.is_empty()
    }

    fn read(&self, key: &CacheKey) -> Result<Option<CachedParents>, StoreError> {
        let key = bincode::serialize(key)?;
        match self.db.get(key)? {
            Some(bytes) => Ok(Some(bincode::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    fn write(&self, key: &CacheKey, parents: &CachedParents) -> Result<(), StoreError> {
        let key = bincode::serialize(key)?;
        let value = bincode::serialize(parents)?;
        self.db.insert(key, value)?;
        Ok(())
    }

    /// Flushes pending writes to disk.
    pub fn flush_to_disk(&self) -> Result<(), StoreError> {
        self.db.flush()?;
        Ok(())
    }

    /// Removes every entry and flushes.
    pub fn clear(&self) -> Result<(), StoreError> {
        self.db.clear()?;
        self.db.flush()?;
        Ok(())
    }
}

impl ParentCache for SledParentCache {
    fn get(
        &self,
        token: &EntityToken,
        kind: SearchKind,
        user: Option<&str>,
    ) -> Option<CachedParents> {
        match self.read(&CacheKey::new(token, kind, user)) {
            Ok(hit) => {
                if hit.is_some() {
                    trace!("Stored cache hit for {} ({})", token, kind);
                }
                hit
            }
            Err(e) => {
                warn!("Parent cache read failed for {}: {}", token, e);
                None
            }
        }
    }

    fn store(
        &self,
        token: &EntityToken,
        kind: SearchKind,
        user: Option<&str>,
        parents: &CachedParents,
    ) {
        if let Err(e) = self.write(&CacheKey::new(token, kind, user), parents) {
            warn!("Parent cache write failed for {}: {}", token, e);
        }
    }

    fn flush(&self) {
        if let Err(e) = self.clear() {
            warn!("Parent cache flush failed: {}", e);
        }
    }
}

impl Drop for SledParentCache {
    fn drop(&mut self) {
        let _ = self.db.flush();
    }
}
