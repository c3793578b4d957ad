//! Registration and reference resolution passes
//!
//! `collect` registers every identity of a built tree into a fresh registry.
//! `link` checks every reference against a registry that already holds the
//! whole document, so references may point forwards or backwards.

use log::debug;

use crate::error::Result;
use crate::model::{walk_project, EntityRef, Id, Project, Visitor};
use crate::registry::{EntityKind, IdentityRegistry};

struct Collector {
    registry: IdentityRegistry,
}

impl<'a> Visitor<'a> for Collector {
    fn identity(&mut self, id: &'a Id, entity: EntityRef<'a>) -> Result<()> {
        self.registry.register(id, entity.kind())
    }

    fn reference(&mut self, _: &'a Id, _: &'static str, _: &'static [EntityKind]) -> Result<()> {
        Ok(())
    }
}

struct Linker<'a> {
    registry: &'a IdentityRegistry,
    resolved: usize,
}

impl<'a> Visitor<'a> for Linker<'_> {
    fn identity(&mut self, _: &'a Id, _: EntityRef<'a>) -> Result<()> {
        Ok(())
    }

    fn reference(
        &mut self,
        id: &'a Id,
        field: &'static str,
        expected: &'static [EntityKind],
    ) -> Result<()> {
        self.registry.expect(id, field, expected)?;
        self.resolved += 1;
        Ok(())
    }
}

/// Register every identity in `project`. Fails on the first duplicate.
pub fn collect(project: &Project) -> Result<IdentityRegistry> {
    let mut collector = Collector {
        registry: IdentityRegistry::new(),
    };
    walk_project(project, &mut collector)?;
    Ok(collector.registry)
}

/// Resolve every reference in `project`, returning how many were checked.
pub fn link(project: &Project, registry: &IdentityRegistry) -> Result<usize> {
    let mut linker = Linker {
        registry,
        resolved: 0,
    };
    walk_project(project, &mut linker)?;
    debug!("Linked {} references", linker.resolved);
    Ok(linker.resolved)
}
