//! Parent lookup caching.
//!
//! The level graph consults a [`ParentCache`] before calling the ancestor
//! sources. Entries are keyed by token, lookup kind and the current user.
//! A cached `None` ("no information") is a hit like any other value.

use c1_core::{EntityToken, SearchKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::trace;

/// A cached parent list. `None` records that the sources had no information.
pub type CachedParents = Option<Vec<EntityToken>>;

/// Key of one cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    pub token: EntityToken,
    pub kind: SearchKind,
    pub user: Option<String>,
}

impl CacheKey {
    pub fn new(token: &EntityToken, kind: SearchKind, user: Option<&str>) -> Self {
        Self {
            token: token.clone(),
            kind,
            user: user.map(str::to_string),
        }
    }
}

/// Memoizes ancestor lookups.
///
/// Implementations must treat every failure as a miss. The graph always
/// falls back to the sources.
pub trait ParentCache {
    /// Returns `Some(value)` on a hit.
    fn get(&self, token: &EntityToken, kind: SearchKind, user: Option<&str>)
        -> Option<CachedParents>;

    /// Records the value the sources returned.
    fn store(
        &self,
        token: &EntityToken,
        kind: SearchKind,
        user: Option<&str>,
        parents: &CachedParents,
    );

    /// Drops every entry.
    fn flush(&self);
}

/// Process-local cache backed by a hash map.
#[derive(Debug, Default)]
pub struct MemoryParentCache {
    entries: RwLock<HashMap<CacheKey, CachedParents>>,
}

impl MemoryParentCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ParentCache for MemoryParentCache {
    fn get(
        &self,
        token: &EntityToken,
        kind: SearchKind,
        user: Option<&str>,
    ) -> Option<CachedParents> {
        let entries = self.entries.read().ok()?;
        let hit = entries.get(&CacheKey::new(token, kind, user)).cloned();
        if hit.is_some() {
            trace!("Cache hit for {} ({})", token, kind);
        }
        hit
    }

    fn store(
        &self,
        token: &EntityToken,
        kind: SearchKind,
        user: Option<&str>,
        parents: &CachedParents,
    ) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(CacheKey::new(token, kind, user), parents.clone());
        }
    }

    fn flush(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
    }
}
