//! Identity Registry
//!
//! Maps identity tokens to the kind of entity that owns them. A registry is
//! scoped to one build or load session and is passed explicitly into every
//! call that needs it.

use std::collections::HashMap;
use std::fmt;

use log::debug;
use serde::Serialize;

use crate::error::{DawError, Result};
use crate::model::Id;

/// Kind of a referenceable entity, used to check references point at the
/// right sort of thing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EntityKind {
    Track,
    Channel,
    Send,
    Parameter,
    Timeline,
    Device,
    Arrangement,
    Scene,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Track => "track",
            EntityKind::Channel => "channel",
            EntityKind::Send => "send",
            EntityKind::Parameter => "parameter",
            EntityKind::Timeline => "timeline",
            EntityKind::Device => "device",
            EntityKind::Arrangement => "arrangement",
            EntityKind::Scene => "scene",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Token table for one session
#[derive(Debug, Default, Clone)]
pub struct IdentityRegistry {
    entries: HashMap<Id, EntityKind>,
    next: u64,
}

impl IdentityRegistry {
    /// Token prefix for assigned ids
    pub const PREFIX: &'static str = "id";

    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next unused token and register it.
    ///
    /// Tokens already registered from the wire are skipped, so building on top
    /// of a loaded document never collides.
    pub fn assign(&mut self, kind: EntityKind) -> Id {
        loop {
            let id = Id::new(format!("{}{}", Self::PREFIX, self.next));
            self.next += 1;
            if !self.entries.contains_key(&id) {
                debug!("Assigned {} to new {}", id, kind);
                self.entries.insert(id.clone(), kind);
                return id;
            }
        }
    }

    /// Bind a wire supplied token.
    pub fn register(&mut self, id: &Id, kind: EntityKind) -> Result<()> {
        if self.entries.contains_key(id) {
            return Err(DawError::DuplicateIdentity { id: id.to_string() });
        }
        self.entries.insert(id.clone(), kind);
        Ok(())
    }

    /// Kind registered for `id`. `Project::resolve` returns the entity itself.
    pub fn resolve(&self, id: &Id) -> Option<EntityKind> {
        self.entries.get(id).copied()
    }

    /// Resolve a reference held in `field`, checking it names one of `expected`.
    pub fn expect(&self, id: &Id, field: &str, expected: &[EntityKind]) -> Result<EntityKind> {
        let found = self.resolve(id).ok_or_else(|| DawError::DanglingReference {
            id: id.to_string(),
            field: field.to_string(),
        })?;

        if !expected.is_empty() && !expected.contains(&found) {
            return Err(DawError::ReferenceKindMismatch {
                id: id.to_string(),
                field: field.to_string(),
                expected: expected
                    .iter()
                    .map(EntityKind::as_str)
                    .collect::<Vec<_>>()
                    .join(" or "),
                found: found.to_string(),
            });
        }
        Ok(found)
    }

    pub fn contains(&self, id: &Id) -> bool {
        self.entries.contains_key(id)
    }

    /// Forget every token and restart numbering.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.next = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered tokens, sorted
    pub fn ids(&self) -> Vec<&Id> {
        let mut ids: Vec<&Id> = self.entries.keys().collect();
        ids.sort();
        ids
    }

    /// Number of registered tokens per kind
    pub fn count_of(&self, kind: EntityKind) -> usize {
        self.entries.values().filter(|k| **k == kind).count()
    }
}
