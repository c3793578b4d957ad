//! Polymorphic Resolver
//!
//! Static tag to decoder tables, one per abstract role. The sets are closed:
//! a tag missing from a table is handed to the context's unknown tag policy.

use crate::error::{DawError, Result};
use crate::model::{Device, Lane, Parameter, Point, Timeline};
use crate::serialize::{device, parameter, structure, timeline, DecodeContext, Element};

/// Decoder for one variant of a role
pub type Decoder<T> = fn(&Element, &mut DecodeContext) -> Result<T>;

/// Closed tag table for an abstract role
pub struct Role<T: 'static> {
    pub name: &'static str,
    table: &'static [(&'static str, Decoder<T>)],
}

impl<T: 'static> Role<T> {
    pub fn lookup(&self, tag: &str) -> Option<Decoder<T>> {
        self.table
            .iter()
            .find(|(name, _)| *name == tag)
            .map(|(_, decoder)| *decoder)
    }

    pub fn is_known(&self, tag: &str) -> bool {
        self.lookup(tag).is_some()
    }

    pub fn tags(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.table.iter().map(|(name, _)| *name)
    }

    /// Decode one element. `Ok(None)` means it was skipped by a lenient policy.
    pub fn decode(&self, element: &Element, ctx: &mut DecodeContext) -> Result<Option<T>> {
        match self.lookup(&element.name) {
            Some(decoder) => decoder(element, ctx).map(Some),
            None => {
                ctx.unknown(self.name, &element.name)?;
                Ok(None)
            }
        }
    }

    /// Decode every child of `parent` except those named in `fixed`.
    pub fn decode_children(
        &self,
        parent: &Element,
        fixed: &[&str],
        ctx: &mut DecodeContext,
    ) -> Result<Vec<T>> {
        let mut out = Vec::new();
        for child in &parent.children {
            if fixed.contains(&child.name.as_str()) {
                continue;
            }
            if let Some(value) = self.decode(child, ctx)? {
                out.push(value);
            }
        }
        Ok(out)
    }

    /// Decode the single polymorphic child of `parent`, ignoring the
    /// children named in `fixed`. A second decodable child is an error.
    pub fn decode_single(
        &self,
        parent: &Element,
        fixed: &[&str],
        ctx: &mut DecodeContext,
    ) -> Result<Option<T>> {
        let mut found = None;
        for child in &parent.children {
            if fixed.contains(&child.name.as_str()) {
                continue;
            }
            let Some(value) = self.decode(child, ctx)? else {
                continue;
            };
            if found.is_some() {
                return Err(DawError::UnexpectedElement {
                    expected: format!("a single {} inside {}", self.name, parent.name),
                    found: child.name.clone(),
                });
            }
            found = Some(value);
        }
        Ok(found)
    }
}

pub static TIMELINE: Role<Timeline> = Role {
    name: "timeline",
    table: &[
        ("Clips", timeline::decode_clips),
        ("Notes", timeline::decode_notes),
        ("Markers", timeline::decode_markers),
        ("Points", timeline::decode_points),
        ("Lanes", timeline::decode_lanes),
        ("Warps", timeline::decode_warps),
        ("Audio", timeline::decode_audio),
        ("Video", timeline::decode_video),
        ("ClipSlot", timeline::decode_clip_slot),
    ],
};

pub static POINT: Role<Point> = Role {
    name: "point",
    table: &[
        ("RealPoint", timeline::decode_real_point),
        ("BoolPoint", timeline::decode_bool_point),
        ("IntegerPoint", timeline::decode_integer_point),
        ("EnumPoint", timeline::decode_enum_point),
        ("TimeSignaturePoint", timeline::decode_time_signature_point),
    ],
};

pub static PARAMETER: Role<Parameter> = Role {
    name: "parameter",
    table: &[
        ("RealParameter", parameter::decode_any_real),
        ("BoolParameter", parameter::decode_any_bool),
        ("IntegerParameter", parameter::decode_any_integer),
        ("EnumParameter", parameter::decode_any_enum),
        ("TimeSignatureParameter", parameter::decode_any_time_signature),
    ],
};

pub static DEVICE: Role<Device> = Role {
    name: "device",
    table: &[
        ("BuiltinDevice", device::decode_builtin),
        ("Equalizer", device::decode_builtin),
        ("Compressor", device::decode_builtin),
        ("Limiter", device::decode_builtin),
        ("NoiseGate", device::decode_builtin),
        ("Vst2Plugin", device::decode_plugin),
        ("Vst3Plugin", device::decode_plugin),
        ("ClapPlugin", device::decode_plugin),
        ("AuPlugin", device::decode_plugin),
    ],
};

pub static LANE: Role<Lane> = Role {
    name: "lane",
    table: &[
        ("Track", structure::decode_track_lane),
        ("Channel", structure::decode_channel_lane),
    ],
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serialize::DecodeOptions;

    #[test]
    fn test_tables_are_closed() {
        assert_eq!(TIMELINE.tags().count(), 9);
        assert!(TIMELINE.is_known("Warps"));
        assert!(!TIMELINE.is_known("warps"));
        assert!(DEVICE.is_known("Vst3Plugin"));
        assert!(!DEVICE.is_known("Plugin"));
    }

    #[test]
    fn test_unknown_tag_strict() {
        let mut ctx = DecodeContext::default();
        let el = Element::new("Hologram").with_attr("id", "id0");
        let err = TIMELINE.decode(&el, &mut ctx).unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_VARIANT");
    }

    #[test]
    fn test_unknown_tag_lenient() {
        let mut ctx = DecodeContext::new(&DecodeOptions::lenient());
        let parent = Element::new("Points")
            .with_child(Element::new("Target"))
            .with_child(Element::new("RealPoint").with_attr("time", "0").with_attr("value", "1"))
            .with_child(Element::new("SplinePoint").with_attr("time", "1"));

        let points = POINT.decode_children(&parent, &["Target"], &mut ctx).unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(ctx.skipped(), ["SplinePoint".to_string()]);
    }

    #[test]
    fn test_single_child_rejects_second() {
        let mut ctx = DecodeContext::default();
        let clip = Element::new("Clip")
            .with_attr("time", "0")
            .with_child(Element::new("Notes").with_attr("id", "id1"))
            .with_child(Element::new("Markers").with_attr("id", "id2"));

        let err = TIMELINE.decode_single(&clip, &[], &mut ctx).unwrap_err();
        assert!(matches!(
            err,
            DawError::UnexpectedElement { ref found, .. } if found == "Markers"
        ));
    }

    #[test]
    fn test_single_child_ignores_skipped_tags() {
        let mut ctx = DecodeContext::new(&DecodeOptions::lenient());
        let clip = Element::new("Clip")
            .with_child(Element::new("Hologram").with_attr("id", "id1"))
            .with_child(Element::new("Notes").with_attr("id", "id2"));

        let content = TIMELINE.decode_single(&clip, &[], &mut ctx).unwrap();
        assert!(matches!(content, Some(Timeline::Notes(_))));
        assert_eq!(ctx.skipped(), ["Hologram".to_string()]);
    }
}
