//! Ancestor provider contracts.
//!
//! The graphs never talk to a security hierarchy directly. They ask an
//! [`AncestorResolver`] for the parents of a token, and the resolver fans
//! out to the native, auxiliary and hooking sources.

use crate::token::EntityToken;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One source of parent tokens.
///
/// `None` means the source knows nothing about the token. `Some(vec![])`
/// means it knows the token has no parents.
pub trait AncestorSource {
    fn parents(&self, token: &EntityToken) -> Option<Vec<EntityToken>>;
}

impl<F> AncestorSource for F
where
    F: Fn(&EntityToken) -> Option<Vec<EntityToken>>,
{
    fn parents(&self, token: &EntityToken) -> Option<Vec<EntityToken>> {
        self(token)
    }
}

/// The capability the relationship graphs expand through.
pub trait AncestorResolver {
    /// Parents from the primary security hierarchy.
    fn native_parents(&self, token: &EntityToken) -> Option<Vec<EntityToken>>;

    /// Parents from the secondary (override) hierarchy.
    fn auxiliary_parents(&self, token: &EntityToken) -> Option<Vec<EntityToken>>;

    /// Parents injected by plugin hooks.
    fn hooking_parents(&self, token: &EntityToken) -> Option<Vec<EntityToken>>;

    /// Name of the logged-in user, if any. Part of every cache key.
    fn current_user(&self) -> Option<String> {
        None
    }
}

/// Which family of lookups a cached parent list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchKind {
    /// The native hierarchy.
    Native,
    /// Auxiliary parents merged with hooks.
    Hooking,
}

impl fmt::Display for SearchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchKind::Native => write!(f, "native"),
            SearchKind::Hooking => write!(f, "hooking"),
        }
    }
}

/// An [`AncestorResolver`] assembled from individual sources.
///
/// Sources that are never set answer `None`.
#[derive(Default)]
pub struct Providers {
    native: Option<Box<dyn AncestorSource>>,
    auxiliary: Option<Box<dyn AncestorSource>>,
    hooking: Option<Box<dyn AncestorSource>>,
    user: Option<String>,
}

impl Providers {
    /// Creates a bundle with no sources.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the native source.
    pub fn native(mut self, source: impl AncestorSource + 'static) -> Self {
        self.native = Some(Box::new(source));
        self
    }

    /// Sets the auxiliary source.
    pub fn auxiliary(mut self, source: impl AncestorSource + 'static) -> Self {
        self.auxiliary = Some(Box::new(source));
        self
    }

    /// Sets the hooking source.
    pub fn hooking(mut self, source: impl AncestorSource + 'static) -> Self {
        self.hooking = Some(Box::new(source));
        self
    }

    /// Sets the user reported by [`AncestorResolver::current_user`].
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }
}

impl fmt::Debug for Providers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Providers")
            .field("native", &self.native.is_some())
            .field("auxiliary", &self.auxiliary.is_some())
            .field("hooking", &self.hooking.is_some())
            .field("user", &self.user)
            .finish()
    }
}

impl AncestorResolver for Providers {
    fn native_parents(&self, token: &EntityToken) -> Option<Vec<EntityToken>> {
        self.native.as_ref()?.parents(token)
    }

    fn auxiliary_parents(&self, token: &EntityToken) -> Option<Vec<EntityToken>> {
        self.auxiliary.as_ref()?.parents(token)
    }

    fn hooking_parents(&self, token: &EntityToken) -> Option<Vec<EntityToken>> {
        self.hooking.as_ref()?.parents(token)
    }

    fn current_user(&self) -> Option<String> {
        self.user.clone()
    }
}
