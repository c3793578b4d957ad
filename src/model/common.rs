//! Shared fields embedded by every entity

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::registry::{EntityKind, IdentityRegistry};

/// Identity token of a referenceable entity
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id(String);

impl Id {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Id {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

impl From<String> for Id {
    fn from(token: String) -> Self {
        Self(token)
    }
}

/// Optional display name, color and comment
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NameableFields {
    pub name: Option<String>,
    /// Color as `#RRGGBB` text, kept verbatim
    pub color: Option<String>,
    pub comment: Option<String>,
}

impl NameableFields {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }
}

/// Nameable fields plus an identity token
#[derive(Debug, Clone, PartialEq)]
pub struct IdentityFields {
    pub id: Id,
    pub nameable: NameableFields,
}

impl IdentityFields {
    /// Issue a fresh token for an entity of `kind`.
    pub fn assign(registry: &mut IdentityRegistry, kind: EntityKind) -> Self {
        Self {
            id: registry.assign(kind),
            nameable: NameableFields::default(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.nameable.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.nameable.name.as_deref()
    }
}

/// Path to a file, either inside the container or external to it
#[derive(Debug, Clone, PartialEq)]
pub struct FileReference {
    pub path: String,
    /// `Some(true)` when the path points outside the container
    pub external: Option<bool>,
}

impl FileReference {
    pub fn embedded(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            external: Some(false),
        }
    }

    pub fn external(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            external: Some(true),
        }
    }
}
