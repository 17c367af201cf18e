//! Entity tokens.
//!
//! A token is the key of every node in the relationship graphs. Equality,
//! hashing and ordering all use the (type, source, id) triple.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifies one securable entity (a page, a data row, a user, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityToken {
    /// Kind of entity, e.g. `page`.
    #[serde(rename = "type")]
    pub type_name: String,

    /// Provider or store the entity comes from. May be empty.
    #[serde(default)]
    pub source: String,

    /// Identity within the type and source.
    pub id: String,
}

impl EntityToken {
    /// Creates a new token.
    pub fn new(
        type_name: impl Into<String>,
        source: impl Into<String>,
        id: impl Into<String>,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            source: source.into(),
            id: id.into(),
        }
    }

    /// The token that stands for "no entity". Same as `EntityToken::default()`.
    ///
    /// Graph construction rejects it and parent lists skip it.
    pub fn null() -> Self {
        Self::new("", "", "")
    }

    /// Returns true when neither a type nor an id is set.
    pub fn is_null(&self) -> bool {
        self.type_name.is_empty() && self.id.is_empty()
    }
}

impl fmt::Display for EntityToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.type_name, self.source, self.id)
    }
}

impl FromStr for EntityToken {
    type Err = CoreError;

    /// Parses `type:source:id`. Only the first two colons split, so ids
    /// may contain colons of their own.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(type_name), Some(source), Some(id)) if !type_name.is_empty() => {
                Ok(Self::new(type_name, source, id))
            }
            _ => Err(CoreError::InvalidToken(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_parse_display() {
        let token: EntityToken = "page:pages:about".parse().unwrap();
        assert_eq!(token, EntityToken::new("page", "pages", "about"));
        assert_eq!(token.to_string(), "page:pages:about");
    }

    #[test]
    fn test_parse_keeps_colons_in_id() {
        let token: EntityToken = "data:sql:Composite.Data:42".parse().unwrap();
        assert_eq!(token.source, "sql");
        assert_eq!(token.id, "Composite.Data:42");
    }

    #[test]
    fn test_parse_rejects_short_input() {
        assert!("page".parse::<EntityToken>().is_err());
        assert!("page:pages".parse::<EntityToken>().is_err());
        assert!(":pages:about".parse::<EntityToken>().is_err());
    }

    #[test]
    fn test_null_token() {
        assert!(EntityToken::null().is_null());
        assert!(!EntityToken::new("page", "", "").is_null());
        assert!(!EntityToken::new("", "", "x").is_null());
    }

    #[test]
    fn test_hash_uses_all_fields() {
        let mut set = HashSet::new();
        set.insert(EntityToken::new("page", "a", "1"));
        set.insert(EntityToken::new("page", "b", "1"));
        set.insert(EntityToken::new("page", "a", "1"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_serde_field_names() {
        let token = EntityToken::new("page", "pages", "about");
        let json = serde_json::to_value(&token).unwrap();
        assert_eq!(json["type"], "page");

        let back: EntityToken =
            serde_json::from_str(r#"{"type":"user","id":"admin"}"#).unwrap();
        assert_eq!(back, EntityToken::new("user", "", "admin"));
    }
}
