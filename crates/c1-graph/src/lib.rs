//! C1 Graph - Permission ancestry graphs
//!
//! This crate answers "which entities can grant permissions onto this
//! one?" by walking the parents reported for an [`EntityToken`].
//!
//! # Graphs
//!
//! - [`RelationshipGraph`] expands breadth-first, one level per parent hop,
//!   eagerly or on demand. Every token appears once in the whole graph.
//! - [`RelationshipOrientedGraph`] keeps every parent link and lists all
//!   ancestor paths from the query token.
//!
//! Both take an [`AncestorResolver`](c1_core::AncestorResolver) for parent
//! lookups. The level graph can memoize lookups in a [`ParentCache`].
//!
//! # Example
//!
//! ```
//! use c1_core::{EntityToken, Hierarchy, HierarchyEntry};
//! use c1_graph::{RelationshipGraph, RelationshipGraphSearchOption};
//!
//! let page = EntityToken::new("page", "pages", "about");
//! let site = EntityToken::new("site", "pages", "root");
//!
//! let hierarchy = Hierarchy::new()
//!     .with_entry(HierarchyEntry::new(page.clone()).native(vec![site.clone()]))
//!     .unwrap();
//!
//! let graph = RelationshipGraph::new(page, RelationshipGraphSearchOption::Native, &hierarchy)
//!     .unwrap();
//! assert_eq!(graph.top_nodes()[0].entity_token, site);
//! ```

mod cache;
mod error;
mod level;
mod oriented;
mod relationship;
mod store;

pub use cache::{CacheKey, CachedParents, MemoryParentCache, ParentCache};
pub use error::{GraphError, Result};
pub use level::{
    RelationshipGraphLevel, RelationshipGraphNode, RelationshipGraphNodeType,
    RelationshipGraphSearchOption,
};
pub use oriented::{Expansion, OrientedNode, RelationshipOrientedGraph};
pub use relationship::{
    Levels, NodeId, RelationshipGraph, RelationshipGraphBuilder, MAX_LEVELS,
};
pub use store::{SledParentCache, StoreError};

pub use c1_core::EntityToken;
