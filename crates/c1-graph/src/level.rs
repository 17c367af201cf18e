//! Node and level values of the level-oriented graph.

use c1_core::EntityToken;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which ancestor sources a [`RelationshipGraph`](crate::RelationshipGraph)
/// consults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipGraphSearchOption {
    /// Only the native hierarchy.
    #[default]
    Native,
    /// Only auxiliary parents and hooks.
    Hooked,
    /// Native first, then auxiliary parents and hooks.
    Both,
}

impl RelationshipGraphSearchOption {
    pub fn includes_native(self) -> bool {
        matches!(self, Self::Native | Self::Both)
    }

    pub fn includes_hooked(self) -> bool {
        matches!(self, Self::Hooked | Self::Both)
    }
}

impl fmt::Display for RelationshipGraphSearchOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Native => "native",
            Self::Hooked => "hooked",
            Self::Both => "both",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for RelationshipGraphSearchOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "native" => Ok(Self::Native),
            "hooked" => Ok(Self::Hooked),
            "both" => Ok(Self::Both),
            other => Err(format!("unknown search option '{}'", other)),
        }
    }
}

/// How a node was discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipGraphNodeType {
    /// Found through the native hierarchy (and the query node itself).
    Entity,
    /// Found through auxiliary parents or hooks.
    Hooking,
}

/// One node of the level-oriented graph.
///
/// Links to the child and the parents live in the owning graph; see
/// [`RelationshipGraph::child_of`](crate::RelationshipGraph::child_of).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipGraphNode {
    pub entity_token: EntityToken,
    /// Parent hops from the query node.
    pub level: usize,
    pub node_type: RelationshipGraphNodeType,
}

impl RelationshipGraphNode {
    pub fn new(entity_token: EntityToken, level: usize, node_type: RelationshipGraphNodeType) -> Self {
        Self {
            entity_token,
            level,
            node_type,
        }
    }
}

/// Read-only view of one level: native and hooked tokens kept apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipGraphLevel {
    pub level: usize,
    pub entities: Vec<EntityToken>,
    pub hooked_entities: Vec<EntityToken>,
}

impl RelationshipGraphLevel {
    /// Partitions the nodes of a level by node type, keeping their order.
    pub fn new<'n>(level: usize, nodes: impl IntoIterator<Item = &'n RelationshipGraphNode>) -> Self {
        let mut entities = Vec::new();
        let mut hooked_entities = Vec::new();

        for node in nodes {
            match node.node_type {
                RelationshipGraphNodeType::Entity => entities.push(node.entity_token.clone()),
                RelationshipGraphNodeType::Hooking => {
                    hooked_entities.push(node.entity_token.clone())
                }
            }
        }

        Self {
            level,
            entities,
            hooked_entities,
        }
    }

    /// Every token on the level, native ones first.
    pub fn all_entities(&self) -> impl Iterator<Item = &EntityToken> {
        self.entities.iter().chain(self.hooked_entities.iter())
    }

    pub fn len(&self) -> usize {
        self.entities.len() + self.hooked_entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for RelationshipGraphLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Level: {}", self.level)?;
        for token in &self.entities {
            writeln!(
                f,
                "Native: Type = {} Source = {} Id = {}",
                token.type_name, token.source, token.id
            )?;
        }
        for token in &self.hooked_entities {
            writeln!(
                f,
                "Hooked: Type = {} Source = {} Id = {}",
                token.type_name, token.source, token.id
            )?;
        }
        writeln!(f, "---------")
    }
}
