//! Serialization Engine
//!
//! Renders entities into `Element` trees and rebuilds them. Decoding runs in
//! two passes: every node is built and its token registered first, then
//! `link` walks the finished tree and resolves every reference. Encoding a
//! project runs the same registration and link checks before rendering, so a
//! tree with duplicate tokens or dangling references is never emitted.

pub mod device;
pub mod document;
pub mod element;
pub mod link;
pub mod parameter;
pub mod resolver;
pub mod structure;
pub mod timeline;
pub mod xml;

use log::{debug, warn};

use crate::codec;
use crate::error::{DawError, Result};
use crate::model::{Id, IdentityFields, MetaData, NameableFields, Project};
use crate::registry::{EntityKind, IdentityRegistry};

pub use element::Element;
pub use xml::WriteOptions;

/// Render an entity as an element.
pub trait ToElement {
    fn to_element(&self) -> Result<Element>;
}

/// Rebuild an entity from an element. References are stored unresolved;
/// identities are registered in the context.
pub trait FromElement: Sized {
    fn from_element(element: &Element, ctx: &mut DecodeContext) -> Result<Self>;
}

/// What to do with an element whose tag is not in its role's table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownTagPolicy {
    /// Fail with `UnknownVariant`
    #[default]
    Strict,
    /// Skip the element and count it
    Lenient,
}

/// Options for decoding
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodeOptions {
    pub policy: UnknownTagPolicy,
}

impl DecodeOptions {
    pub fn strict() -> Self {
        Self {
            policy: UnknownTagPolicy::Strict,
        }
    }

    pub fn lenient() -> Self {
        Self {
            policy: UnknownTagPolicy::Lenient,
        }
    }
}

/// State carried through one decode session
#[derive(Debug)]
pub struct DecodeContext {
    pub registry: IdentityRegistry,
    pub policy: UnknownTagPolicy,
    skipped: Vec<String>,
}

impl DecodeContext {
    pub fn new(options: &DecodeOptions) -> Self {
        Self {
            registry: IdentityRegistry::new(),
            policy: options.policy,
            skipped: Vec::new(),
        }
    }

    pub fn register(&mut self, id: &Id, kind: EntityKind) -> Result<()> {
        self.registry.register(id, kind)
    }

    /// Apply the unknown tag policy to an element of `role`.
    pub fn unknown(&mut self, role: &str, tag: &str) -> Result<()> {
        match self.policy {
            UnknownTagPolicy::Strict => Err(DawError::UnknownVariant {
                role: role.to_string(),
                tag: tag.to_string(),
            }),
            UnknownTagPolicy::Lenient => {
                warn!("Skipping unknown {} element <{}>", role, tag);
                self.skipped.push(tag.to_string());
                Ok(())
            }
        }
    }

    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }

    pub fn finish<T>(self, value: T) -> Decoded<T> {
        Decoded {
            value,
            registry: self.registry,
            skipped: self.skipped,
        }
    }
}

impl Default for DecodeContext {
    fn default() -> Self {
        Self::new(&DecodeOptions::default())
    }
}

/// Result of a decode session
#[derive(Debug)]
pub struct Decoded<T> {
    pub value: T,
    /// Every token registered while decoding
    pub registry: IdentityRegistry,
    /// Tags skipped under the lenient policy
    pub skipped: Vec<String>,
}

// === Shared Field Helpers ===

pub(crate) fn write_nameable(element: &mut Element, fields: &NameableFields) {
    element.set_opt_attr("name", fields.name.clone());
    element.set_opt_attr("color", fields.color.clone());
    element.set_opt_attr("comment", fields.comment.clone());
}

pub(crate) fn read_nameable(element: &Element) -> NameableFields {
    NameableFields {
        name: element.attr("name").map(str::to_string),
        color: element.attr("color").map(str::to_string),
        comment: element.attr("comment").map(str::to_string),
    }
}

pub(crate) fn write_identity(element: &mut Element, fields: &IdentityFields) {
    element.set_attr("id", fields.id.as_str());
    write_nameable(element, &fields.nameable);
}

/// Read a mandatory `id` and register it under `kind`.
pub(crate) fn read_identity(
    element: &Element,
    ctx: &mut DecodeContext,
    kind: EntityKind,
) -> Result<IdentityFields> {
    let id = Id::new(element.required_attr("id")?);
    ctx.register(&id, kind)?;
    Ok(IdentityFields {
        id,
        nameable: read_nameable(element),
    })
}

pub(crate) fn read_reference(element: &Element, key: &str) -> Option<Id> {
    element
        .attr(key)
        .filter(|v| !v.is_empty())
        .map(Id::new)
}

pub(crate) fn required_real(element: &Element, key: &str) -> Result<f64> {
    codec::decode_real(key, element.attr(key))?.ok_or_else(|| DawError::missing(&element.name, key))
}

pub(crate) fn required_int<T>(element: &Element, key: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    codec::decode_int(key, element.attr(key))?.ok_or_else(|| DawError::missing(&element.name, key))
}

// === Entry Points ===

/// Encode a project after checking its tokens are unique and every
/// reference resolves.
pub fn encode_project(project: &Project) -> Result<Element> {
    let registry = link::collect(project)?;
    let resolved = link::link(project, &registry)?;
    debug!(
        "Encoding project: {} identities, {} references",
        registry.len(),
        resolved
    );
    project.to_element()
}

pub fn decode_project(element: &Element) -> Result<Decoded<Project>> {
    decode_project_with(element, &DecodeOptions::default())
}

pub fn decode_project_with(element: &Element, options: &DecodeOptions) -> Result<Decoded<Project>> {
    let mut ctx = DecodeContext::new(options);
    let project = Project::from_element(element, &mut ctx)?;
    let resolved = link::link(&project, &ctx.registry)?;
    debug!(
        "Decoded project: {} identities, {} references, {} skipped",
        ctx.registry.len(),
        resolved,
        ctx.skipped().len()
    );
    Ok(ctx.finish(project))
}

pub fn encode_metadata(metadata: &MetaData) -> Result<Element> {
    metadata.to_element()
}

pub fn decode_metadata(element: &Element) -> Result<MetaData> {
    MetaData::from_element(element, &mut DecodeContext::default())
}

/// Parse and decode a project from XML text.
pub fn read_project(text: &str, options: &DecodeOptions) -> Result<Decoded<Project>> {
    decode_project_with(&xml::parse(text)?, options)
}

pub fn write_project(project: &Project, options: &WriteOptions) -> Result<String> {
    xml::render(&encode_project(project)?, options)
}

pub fn read_metadata(text: &str) -> Result<MetaData> {
    decode_metadata(&xml::parse(text)?)
}

pub fn write_metadata(metadata: &MetaData, options: &WriteOptions) -> Result<String> {
    xml::render(&encode_metadata(metadata)?, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_identity_requires_id() {
        let mut ctx = DecodeContext::default();
        let el = Element::new("Track").with_attr("name", "Bass");
        let err = read_identity(&el, &mut ctx, EntityKind::Track).unwrap_err();
        assert_eq!(err.error_code(), "MISSING_REQUIRED_FIELD");
    }

    #[test]
    fn test_read_identity_registers() {
        let mut ctx = DecodeContext::default();
        let el = Element::new("Track")
            .with_attr("id", "t1")
            .with_attr("color", "#ff0000");
        let identity = read_identity(&el, &mut ctx, EntityKind::Track).unwrap();
        assert_eq!(identity.nameable.color.as_deref(), Some("#ff0000"));
        assert_eq!(ctx.registry.resolve(&identity.id), Some(EntityKind::Track));

        let err = read_identity(&el, &mut ctx, EntityKind::Track).unwrap_err();
        assert_eq!(err.error_code(), "DUPLICATE_IDENTITY");
    }

    #[test]
    fn test_policy_outcomes() {
        let mut strict = DecodeContext::new(&DecodeOptions::strict());
        assert!(strict.unknown("timeline", "Hologram").is_err());

        let mut lenient = DecodeContext::new(&DecodeOptions::lenient());
        lenient.unknown("timeline", "Hologram").unwrap();
        let decoded = lenient.finish(());
        assert_eq!(decoded.skipped, vec!["Hologram".to_string()]);
    }
}
