//! Level-oriented ancestor graph.
//!
//! A [`RelationshipGraph`] answers "which entities sit above this one?" by
//! expanding breadth-first from a query token. Level 0 holds the query
//! token, level `n + 1` the parents first discovered from level `n`.
//!
//! Every token appears once in the whole graph. When two children share a
//! parent only the first discovered edge is kept; later ones are dropped.
//!
//! Expansion can be eager (everything up front) or lazy, where
//! [`RelationshipGraph::level`] grows the graph one level at a time so a
//! permission check can stop as soon as it has its answer.

use crate::cache::ParentCache;
use crate::error::{GraphError, Result};
use crate::level::{
    RelationshipGraphLevel, RelationshipGraphNode, RelationshipGraphNodeType,
    RelationshipGraphSearchOption,
};
use c1_core::{AncestorResolver, EntityToken, SearchKind};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// Unique identifier for a node in the graph.
pub type NodeId = NodeIndex;

/// Deepest frontier the graph will expand from.
pub const MAX_LEVELS: usize = 1000;

/// Breadth-first ancestor graph of one entity token.
///
/// Edges point from a child to the parents discovered for it.
pub struct RelationshipGraph<'a> {
    graph: DiGraph<RelationshipGraphNode, ()>,

    /// Node ids per level, in discovery order.
    levels: Vec<Vec<NodeId>>,

    /// Every token placed in the graph.
    visited: HashMap<EntityToken, NodeId>,

    search_option: RelationshipGraphSearchOption,
    more_levels_to_expand: bool,

    resolver: &'a dyn AncestorResolver,
    cache: Option<&'a dyn ParentCache>,
}

/// Configures a [`RelationshipGraph`] before the first expansion.
pub struct RelationshipGraphBuilder<'a> {
    source: EntityToken,
    search_option: RelationshipGraphSearchOption,
    lazy: bool,
    cache: Option<&'a dyn ParentCache>,
}

impl<'a> RelationshipGraphBuilder<'a> {
    /// Sets which sources are consulted. Defaults to `Native`.
    pub fn search(mut self, option: RelationshipGraphSearchOption) -> Self {
        self.search_option = option;
        self
    }

    /// When true only the first level is expanded up front.
    pub fn lazy(mut self, lazy: bool) -> Self {
        self.lazy = lazy;
        self
    }

    /// Memoizes lookups in the given cache.
    pub fn cache(mut self, cache: &'a dyn ParentCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Builds the graph.
    ///
    /// Level 1 is always expanded. Eager graphs keep expanding until no
    /// new parent turns up.
    pub fn build(self, resolver: &'a dyn AncestorResolver) -> Result<RelationshipGraph<'a>> {
        if self.source.is_null() {
            return Err(GraphError::NullSourceToken);
        }

        let mut graph = RelationshipGraph {
            graph: DiGraph::new(),
            levels: Vec::new(),
            visited: HashMap::new(),
            search_option: self.search_option,
            more_levels_to_expand: false,
            resolver,
            cache: self.cache,
        };

        let root = graph.graph.add_node(RelationshipGraphNode::new(
            self.source.clone(),
            0,
            RelationshipGraphNodeType::Entity,
        ));
        graph.levels.push(vec![root]);
        graph.visited.insert(self.source, root);

        let user = resolver.current_user();
        graph.expand_next_level(user.as_deref())?;

        if !self.lazy {
            while graph.more_levels_to_expand {
                graph.expand_next_level(user.as_deref())?;
            }
        }

        Ok(graph)
    }
}

impl<'a> RelationshipGraph<'a> {
    /// Builds a fully expanded graph.
    pub fn new(
        source: EntityToken,
        search_option: RelationshipGraphSearchOption,
        resolver: &'a dyn AncestorResolver,
    ) -> Result<Self> {
        Self::builder(source).search(search_option).build(resolver)
    }

    /// Starts configuring a graph rooted at `source`.
    pub fn builder(source: EntityToken) -> RelationshipGraphBuilder<'a> {
        RelationshipGraphBuilder {
            source,
            search_option: RelationshipGraphSearchOption::default(),
            lazy: false,
            cache: None,
        }
    }

    /// The query node.
    pub fn root(&self) -> &RelationshipGraphNode {
        &self.graph[self.levels[0][0]]
    }

    pub fn search_option(&self) -> RelationshipGraphSearchOption {
        self.search_option
    }

    /// Number of levels expanded so far, the query level included.
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// True while the last expansion discovered new parents.
    pub fn has_more_levels(&self) -> bool {
        self.more_levels_to_expand
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Gets a node by id.
    pub fn node(&self, id: NodeId) -> Option<&RelationshipGraphNode> {
        self.graph.node_weight(id)
    }

    /// Finds the node holding a token.
    pub fn find(&self, token: &EntityToken) -> Option<NodeId> {
        self.visited.get(token).copied()
    }

    /// Parents of a node, in discovery order.
    pub fn parents_of(&self, id: NodeId) -> Vec<NodeId> {
        let mut parents: Vec<NodeId> = self
            .graph
            .neighbors_directed(id, Direction::Outgoing)
            .collect();
        // Node indexes grow with discovery.
        parents.sort();
        parents
    }

    /// The node this one was discovered from. `None` for the query node.
    pub fn child_of(&self, id: NodeId) -> Option<NodeId> {
        self.graph
            .neighbors_directed(id, Direction::Incoming)
            .next()
    }

    /// Nodes without parents, level by level.
    ///
    /// On a lazy graph this includes the unexpanded frontier.
    pub fn top_nodes(&self) -> Vec<&RelationshipGraphNode> {
        self.nodes_where(|id| {
            self.graph
                .neighbors_directed(id, Direction::Outgoing)
                .next()
                .is_none()
        })
    }

    /// Nodes without a child, level by level.
    pub fn bottom_nodes(&self) -> Vec<&RelationshipGraphNode> {
        self.nodes_where(|id| self.child_of(id).is_none())
    }

    fn nodes_where(&self, predicate: impl Fn(NodeId) -> bool) -> Vec<&RelationshipGraphNode> {
        self.levels
            .iter()
            .flatten()
            .copied()
            .filter(|&id| predicate(id))
            .map(|id| &self.graph[id])
            .collect()
    }

    /// Returns a level, expanding the graph until it exists.
    ///
    /// `Ok(None)` once `level` is past the deepest level the sources can
    /// produce. Further calls do not expand again.
    pub fn level(&mut self, level: usize) -> Result<Option<RelationshipGraphLevel>> {
        let user = self.resolver.current_user();

        while self.levels.len() <= level && self.more_levels_to_expand {
            self.expand_next_level(user.as_deref())?;
        }

        Ok(self.levels.get(level).map(|_| self.level_view(level)))
    }

    /// Iterates over all levels, expanding lazily.
    pub fn levels(&mut self) -> Levels<'_, 'a> {
        Levels {
            graph: self,
            next: 0,
            done: false,
        }
    }

    /// Views of the levels expanded so far. Never expands.
    pub fn expanded_levels(&self) -> Vec<RelationshipGraphLevel> {
        (0..self.levels.len())
            .map(|level| self.level_view(level))
            .collect()
    }

    /// Expands until no new parents are found.
    pub fn expand_all(&mut self) -> Result<()> {
        let user = self.resolver.current_user();
        while self.more_levels_to_expand {
            self.expand_next_level(user.as_deref())?;
        }
        Ok(())
    }

    /// Expands fully, then renders every level like [`Display`](fmt::Display).
    pub fn dump(&mut self) -> Result<String> {
        self.expand_all()?;
        Ok(self.to_string())
    }

    fn level_view(&self, level: usize) -> RelationshipGraphLevel {
        RelationshipGraphLevel::new(level, self.levels[level].iter().map(|&id| &self.graph[id]))
    }

    /// Discovers the parents of every node on the last level.
    fn expand_next_level(&mut self, user: Option<&str>) -> Result<()> {
        let level_number = self.levels.len() - 1;

        if level_number > MAX_LEVELS {
            return Err(GraphError::ProbableInfiniteLoop {
                token: self.root().entity_token.clone(),
                levels: MAX_LEVELS,
            });
        }

        self.more_levels_to_expand = false;

        let frontier = self.levels[level_number].clone();
        for child in frontier {
            let token = self.graph[child].entity_token.clone();

            if self.search_option.includes_native() {
                let parents = self.lookup(&token, SearchKind::Native, user, |resolver, token| {
                    resolver.native_parents(token)
                });
                if let Some(parents) = parents {
                    self.add_parents(child, parents, RelationshipGraphNodeType::Entity);
                }
            }

            if self.search_option.includes_hooked() {
                let parents =
                    self.lookup(&token, SearchKind::Hooking, user, hooked_parents);
                if let Some(parents) = parents {
                    self.add_parents(child, parents, RelationshipGraphNodeType::Hooking);
                }
            }
        }

        debug!(
            "Expanded level {} of {}: {} new node(s)",
            level_number,
            self.root().entity_token,
            self.levels.get(level_number + 1).map_or(0, Vec::len)
        );

        Ok(())
    }

    /// Cache first, then the sources. Whatever the sources return is cached.
    fn lookup(
        &self,
        token: &EntityToken,
        kind: SearchKind,
        user: Option<&str>,
        fetch: impl FnOnce(&dyn AncestorResolver, &EntityToken) -> Option<Vec<EntityToken>>,
    ) -> Option<Vec<EntityToken>> {
        if let Some(hit) = self.cache.and_then(|cache| cache.get(token, kind, user)) {
            return hit;
        }

        let parents = fetch(self.resolver, token);

        if let Some(cache) = self.cache {
            cache.store(token, kind, user, &parents);
        }

        parents
    }

    fn add_parents(
        &mut self,
        child: NodeId,
        parents: Vec<EntityToken>,
        node_type: RelationshipGraphNodeType,
    ) {
        let level = self.graph[child].level + 1;

        for parent in parents {
            if parent.is_null() || self.visited.contains_key(&parent) {
                continue;
            }

            if self.levels.len() == level {
                self.levels.push(Vec::new());
            }

            let id = self
                .graph
                .add_node(RelationshipGraphNode::new(parent.clone(), level, node_type));
            self.visited.insert(parent, id);
            self.levels[level].push(id);
            self.graph.add_edge(child, id, ());

            self.more_levels_to_expand = true;
        }
    }
}

/// Auxiliary parents take precedence; hooks are appended to them. When the
/// auxiliary source has no information only the hooks are used.
fn hooked_parents(
    resolver: &dyn AncestorResolver,
    token: &EntityToken,
) -> Option<Vec<EntityToken>> {
    let auxiliary = resolver.auxiliary_parents(token);
    let hooking = resolver.hooking_parents(token);

    match auxiliary {
        None => hooking,
        Some(mut parents) => {
            if let Some(hooking) = hooking {
                parents.extend(hooking);
            }
            Some(parents)
        }
    }
}

impl fmt::Display for RelationshipGraph<'_> {
    /// Dumps the levels expanded so far, native and hooked tokens listed
    /// apart. See [`RelationshipGraph::dump`] for lazy graphs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for level in self.expanded_levels() {
            write!(f, "{}", level)?;
        }
        Ok(())
    }
}

impl fmt::Debug for RelationshipGraph<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelationshipGraph")
            .field("root", &self.root().entity_token)
            .field("search_option", &self.search_option)
            .field("levels", &self.levels.len())
            .field("nodes", &self.graph.node_count())
            .field("more_levels_to_expand", &self.more_levels_to_expand)
            .finish()
    }
}

/// Lazy iterator over the levels of a graph. Stops after the first error.
pub struct Levels<'g, 'a> {
    graph: &'g mut RelationshipGraph<'a>,
    next: usize,
    done: bool,
}

impl Iterator for Levels<'_, '_> {
    type Item = Result<RelationshipGraphLevel>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.graph.level(self.next) {
            Ok(Some(level)) => {
                self.next += 1;
                Some(Ok(level))
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
