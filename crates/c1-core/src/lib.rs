//! C1 Core - Entity tokens and ancestor providers
//!
//! This crate holds the values every other C1 crate talks about: the
//! [`EntityToken`] that identifies a securable entity, and the provider
//! contracts the relationship graphs use to discover an entity's parents.
//!
//! # Providers
//!
//! Parent discovery is split over three sources:
//! - the native security hierarchy
//! - an auxiliary (override) hierarchy
//! - hooks injected by plugins
//!
//! The graphs only see them through [`AncestorResolver`]. A source answers
//! `None` when it has no information about a token, which is not the same
//! as answering an empty list.
//!
//! # Example
//!
//! ```
//! use c1_core::{AncestorResolver, EntityToken, Providers};
//!
//! let page = EntityToken::new("page", "pages", "about");
//! let site = EntityToken::new("site", "pages", "root");
//!
//! let site_clone = site.clone();
//! let providers = Providers::new().native(move |token: &EntityToken| {
//!     (token.id == "about").then(|| vec![site_clone.clone()])
//! });
//!
//! assert_eq!(providers.native_parents(&page), Some(vec![site]));
//! ```

mod error;
mod hierarchy;
mod source;
mod token;

pub use error::{CoreError, Result};
pub use hierarchy::{Hierarchy, HierarchyEntry};
pub use source::{AncestorResolver, AncestorSource, Providers, SearchKind};
pub use token::EntityToken;
