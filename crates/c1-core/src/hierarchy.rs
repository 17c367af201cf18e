//! Declarative hierarchies.
//!
//! A [`Hierarchy`] answers ancestor lookups from a fixed table, usually
//! read from a JSON document:
//!
//! ```json
//! {
//!   "user": "admin",
//!   "entries": [
//!     {
//!       "token": { "type": "page", "source": "pages", "id": "about" },
//!       "native": [ { "type": "site", "source": "pages", "id": "root" } ],
//!       "hooking": null
//!     }
//!   ]
//! }
//! ```
//!
//! Omitted and `null` lists mean "no information".

use crate::error::{CoreError, Result};
use crate::source::AncestorResolver;
use crate::token::EntityToken;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// The parent lists declared for one token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HierarchyEntry {
    pub token: EntityToken,
    pub native: Option<Vec<EntityToken>>,
    pub auxiliary: Option<Vec<EntityToken>>,
    pub hooking: Option<Vec<EntityToken>>,
}

impl HierarchyEntry {
    /// Creates an entry with no information from any source.
    pub fn new(token: EntityToken) -> Self {
        Self {
            token,
            ..Default::default()
        }
    }

    pub fn native(mut self, parents: Vec<EntityToken>) -> Self {
        self.native = Some(parents);
        self
    }

    pub fn auxiliary(mut self, parents: Vec<EntityToken>) -> Self {
        self.auxiliary = Some(parents);
        self
    }

    pub fn hooking(mut self, parents: Vec<EntityToken>) -> Self {
        self.hooking = Some(parents);
        self
    }
}

#[derive(Deserialize)]
struct RawHierarchy {
    #[serde(default)]
    user: Option<String>,
    #[serde(default)]
    entries: Vec<RawEntry>,
}

#[derive(Deserialize)]
struct RawEntry {
    token: EntityToken,
    #[serde(default)]
    native: Option<Vec<Option<EntityToken>>>,
    #[serde(default)]
    auxiliary: Option<Vec<Option<EntityToken>>>,
    #[serde(default)]
    hooking: Option<Vec<Option<EntityToken>>>,
}

/// Drops `null` elements from a raw parent list.
fn compact(token: &EntityToken, list: Option<Vec<Option<EntityToken>>>) -> Option<Vec<EntityToken>> {
    list.map(|items| {
        let total = items.len();
        let kept: Vec<EntityToken> = items.into_iter().flatten().collect();
        if kept.len() != total {
            debug!("Dropped {} null parent(s) of {}", total - kept.len(), token);
        }
        kept
    })
}

/// A table-driven [`AncestorResolver`].
#[derive(Debug, Clone, Default)]
pub struct Hierarchy {
    entries: HashMap<EntityToken, HierarchyEntry>,
    user: Option<String>,
}

impl Hierarchy {
    /// Creates an empty hierarchy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a hierarchy document.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawHierarchy = serde_json::from_str(json)?;

        let mut hierarchy = Self::new();
        hierarchy.user = raw.user;

        for entry in raw.entries {
            let token = entry.token;
            let native = compact(&token, entry.native);
            let auxiliary = compact(&token, entry.auxiliary);
            let hooking = compact(&token, entry.hooking);

            hierarchy.insert(HierarchyEntry {
                token,
                native,
                auxiliary,
                hooking,
            })?;
        }

        debug!("Loaded hierarchy with {} entries", hierarchy.len());
        Ok(hierarchy)
    }

    /// Reads and parses a hierarchy file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| CoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Adds an entry. Each token may be declared once.
    pub fn insert(&mut self, entry: HierarchyEntry) -> Result<()> {
        if entry.token.is_null() {
            return Err(CoreError::NullEntry);
        }
        if self.entries.contains_key(&entry.token) {
            return Err(CoreError::DuplicateEntry(entry.token.to_string()));
        }
        self.entries.insert(entry.token.clone(), entry);
        Ok(())
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with_entry(mut self, entry: HierarchyEntry) -> Result<Self> {
        self.insert(entry)?;
        Ok(self)
    }

    /// Overrides the user reported to caches.
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Looks up the entry declared for a token.
    pub fn get(&self, token: &EntityToken) -> Option<&HierarchyEntry> {
        self.entries.get(token)
    }

    /// Returns the number of declared tokens.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl AncestorResolver for Hierarchy {
    fn native_parents(&self, token: &EntityToken) -> Option<Vec<EntityToken>> {
        self.get(token)?.native.clone()
    }

    fn auxiliary_parents(&self, token: &EntityToken) -> Option<Vec<EntityToken>> {
        self.get(token)?.auxiliary.clone()
    }

    fn hooking_parents(&self, token: &EntityToken) -> Option<Vec<EntityToken>> {
        self.get(token)?.hooking.clone()
    }

    fn current_user(&self) -> Option<String> {
        self.user.clone()
    }
}
