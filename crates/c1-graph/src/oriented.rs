//! Path-oriented ancestor graph.
//!
//! Where [`RelationshipGraph`](crate::RelationshipGraph) flattens ancestry
//! into levels, this graph keeps every parent link so that all paths from
//! the query token up to its roots can be listed. Nodes are expanded on
//! first access only.

use crate::error::{GraphError, Result};
use c1_core::{AncestorResolver, EntityToken};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Unique identifier for a node in the graph.
pub type NodeId = NodeIndex;

/// Whether a node's parents have been looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expansion {
    Unexpanded,
    Expanded,
}

/// One token in the graph.
#[derive(Debug, Clone)]
pub struct OrientedNode {
    pub entity_token: EntityToken,
    pub expansion: Expansion,
}

/// Ancestor graph with lazily expanded parent links.
///
/// Each token maps to exactly one node; a parent reached from two children
/// is shared.
pub struct RelationshipOrientedGraph<'a> {
    graph: DiGraph<OrientedNode, ()>,
    index: HashMap<EntityToken, NodeId>,
    root: NodeId,
    resolver: &'a dyn AncestorResolver,
}

impl<'a> RelationshipOrientedGraph<'a> {
    /// Creates a graph holding only the unexpanded source node.
    pub fn new(source: EntityToken, resolver: &'a dyn AncestorResolver) -> Result<Self> {
        if source.is_null() {
            return Err(GraphError::NullSourceToken);
        }

        let mut graph = Self {
            graph: DiGraph::new(),
            index: HashMap::new(),
            root: NodeIndex::new(0),
            resolver,
        };
        graph.root = graph.node_for(source);

        Ok(graph)
    }

    /// The query node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&OrientedNode> {
        self.graph.node_weight(id)
    }

    pub fn token(&self, id: NodeId) -> Option<&EntityToken> {
        self.node(id).map(|node| &node.entity_token)
    }

    pub fn find(&self, token: &EntityToken) -> Option<NodeId> {
        self.index.get(token).copied()
    }

    /// Number of nodes created so far.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_expanded(&self, id: NodeId) -> bool {
        self.node(id)
            .is_some_and(|node| node.expansion == Expansion::Expanded)
    }

    /// Parents of a node in the order they were reported, expanding the
    /// node on first access.
    pub fn parents(&mut self, id: NodeId) -> Vec<NodeId> {
        self.expand(id);

        let mut edges: Vec<_> = self
            .graph
            .edges_directed(id, Direction::Outgoing)
            .map(|edge| (edge.id(), edge.target()))
            .collect();
        edges.sort();
        edges.into_iter().map(|(_, parent)| parent).collect()
    }

    /// Every ancestor path starting at the query node.
    pub fn all_paths(&mut self) -> Vec<Vec<EntityToken>> {
        self.all_paths_from(self.root)
    }

    /// Every ancestor path starting at `start`, which comes first in each
    /// path.
    ///
    /// A path ends at a node without parents, or at a node whose only parent
    /// is already on the path. At a node with several parents the path forks
    /// once per parent not yet on it; each fork tracks its own visited nodes,
    /// so a node may show up on several forks. If every parent is already on
    /// the path the path is dropped.
    pub fn all_paths_from(&mut self, start: NodeId) -> Vec<Vec<EntityToken>> {
        let mut paths = Vec::new();
        let Some(token) = self.token(start).cloned() else {
            return paths;
        };

        self.walk(start, vec![token], HashSet::from([start]), &mut paths);
        paths
    }

    fn walk(
        &mut self,
        mut node: NodeId,
        mut path: Vec<EntityToken>,
        mut on_path: HashSet<NodeId>,
        paths: &mut Vec<Vec<EntityToken>>,
    ) {
        loop {
            let parents = self.parents(node);

            match parents.as_slice() {
                [] => break,
                &[parent] => {
                    if !on_path.insert(parent) {
                        break;
                    }
                    path.push(self.graph[parent].entity_token.clone());
                    node = parent;
                }
                _ => {
                    for &parent in &parents {
                        if on_path.contains(&parent) {
                            continue;
                        }

                        let mut branch = path.clone();
                        branch.push(self.graph[parent].entity_token.clone());
                        let mut branch_seen = on_path.clone();
                        branch_seen.insert(parent);

                        self.walk(parent, branch, branch_seen, paths);
                    }
                    return;
                }
            }
        }

        paths.push(path);
    }

    /// Looks up native, auxiliary and hooking parents, in that order.
    fn expand(&mut self, id: NodeId) {
        let token = match self.graph.node_weight_mut(id) {
            Some(node) if node.expansion == Expansion::Unexpanded => {
                node.expansion = Expansion::Expanded;
                node.entity_token.clone()
            }
            _ => return,
        };

        let resolver = self.resolver;
        let sources = [
            resolver.native_parents(&token),
            resolver.auxiliary_parents(&token),
            resolver.hooking_parents(&token),
        ];

        for parent in sources.into_iter().flatten().flatten() {
            if parent.is_null() {
                continue;
            }
            let parent = self.node_for(parent);
            if self.graph.find_edge(id, parent).is_none() {
                self.graph.add_edge(id, parent, ());
            }
        }
    }

    /// Returns the node for a token, creating it if needed.
    fn node_for(&mut self, token: EntityToken) -> NodeId {
        if let Some(&id) = self.index.get(&token) {
            return id;
        }

        let id = self.graph.add_node(OrientedNode {
            entity_token: token.clone(),
            expansion: Expansion::Unexpanded,
        });
        self.index.insert(token, id);
        id
    }
}

impl fmt::Debug for RelationshipOrientedGraph<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelationshipOrientedGraph")
            .field("root", &self.graph[self.root].entity_token)
            .field("nodes", &self.graph.node_count())
            .field("edges", &self.graph.edge_count())
            .finish()
    }
}
