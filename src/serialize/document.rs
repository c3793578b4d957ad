//! Project and metadata document encoding

use crate::error::{DawError, Result};
use crate::model::{Application, Arrangement, MetaData, Project, Scene, Transport};
use crate::registry::EntityKind;
use crate::serialize::parameter::{
    decode_real, decode_time_signature, encode_real, encode_time_signature,
};
use crate::serialize::resolver::{LANE, TIMELINE};
use crate::serialize::timeline::{
    decode_lanes_body, decode_markers_body, decode_points_body, encode_lanes, encode_markers,
    encode_points,
};
use crate::serialize::{read_identity, write_identity, DecodeContext, Element, FromElement, ToElement};

impl ToElement for Project {
    fn to_element(&self) -> Result<Element> {
        let mut el = Element::new("Project").with_attr("version", self.version.as_str());
        el.push(encode_application(&self.application));
        if let Some(transport) = &self.transport {
            el.push(encode_transport(transport));
        }

        let mut structure = Element::new("Structure");
        for lane in &self.structure {
            structure.push(lane.to_element()?);
        }
        el.push(structure);

        if let Some(arrangement) = &self.arrangement {
            el.push(arrangement.to_element()?);
        }
        if !self.scenes.is_empty() {
            let mut scenes = Element::new("Scenes");
            for scene in &self.scenes {
                scenes.push(scene.to_element()?);
            }
            el.push(scenes);
        }
        Ok(el)
    }
}

impl FromElement for Project {
    fn from_element(el: &Element, ctx: &mut DecodeContext) -> Result<Self> {
        el.expect_name("Project")?;

        let structure = match el.child("Structure") {
            Some(structure) => LANE.decode_children(structure, &[], ctx)?,
            None => Vec::new(),
        };
        let transport = el
            .child("Transport")
            .map(|transport| decode_transport(transport, ctx))
            .transpose()?;
        let arrangement = el
            .child("Arrangement")
            .map(|arrangement| Arrangement::from_element(arrangement, ctx))
            .transpose()?;
        let scenes = match el.child("Scenes") {
            Some(scenes) => scenes
                .children_named("Scene")
                .map(|scene| Scene::from_element(scene, ctx))
                .collect::<Result<Vec<_>>>()?,
            None => Vec::new(),
        };

        Ok(Project {
            version: el.required_attr("version")?.to_string(),
            application: decode_application(el.required_child("Application")?)?,
            transport,
            structure,
            arrangement,
            scenes,
        })
    }
}

fn encode_application(application: &Application) -> Element {
    Element::new("Application")
        .with_attr("name", application.name.as_str())
        .with_attr("version", application.version.as_str())
}

fn decode_application(el: &Element) -> Result<Application> {
    Ok(Application {
        name: el.required_attr("name")?.to_string(),
        version: el.required_attr("version")?.to_string(),
    })
}

fn encode_transport(transport: &Transport) -> Element {
    let mut el = Element::new("Transport");
    if let Some(tempo) = &transport.tempo {
        el.push(encode_real(tempo, "Tempo"));
    }
    if let Some(ts) = &transport.time_signature {
        el.push(encode_time_signature(ts, "TimeSignature"));
    }
    el
}

fn decode_transport(el: &Element, ctx: &mut DecodeContext) -> Result<Transport> {
    Ok(Transport {
        tempo: el
            .child("Tempo")
            .map(|tempo| decode_real(tempo, ctx))
            .transpose()?,
        time_signature: el
            .child("TimeSignature")
            .map(|ts| decode_time_signature(ts, ctx))
            .transpose()?,
    })
}

// === Arrangement ===

impl ToElement for Arrangement {
    fn to_element(&self) -> Result<Element> {
        let mut el = Element::new("Arrangement");
        write_identity(&mut el, &self.identity);
        if let Some(points) = &self.time_signature_automation {
            el.push(encode_points(points, "TimeSignatureAutomation"));
        }
        if let Some(points) = &self.tempo_automation {
            el.push(encode_points(points, "TempoAutomation"));
        }
        if let Some(markers) = &self.markers {
            el.push(encode_markers(markers));
        }
        if let Some(lanes) = &self.lanes {
            el.push(encode_lanes(lanes, "Lanes")?);
        }
        Ok(el)
    }
}

impl FromElement for Arrangement {
    fn from_element(el: &Element, ctx: &mut DecodeContext) -> Result<Self> {
        let identity = read_identity(el, ctx, EntityKind::Arrangement)?;
        Ok(Arrangement {
            identity,
            time_signature_automation: el
                .child("TimeSignatureAutomation")
                .map(|points| decode_points_body(points, ctx))
                .transpose()?,
            tempo_automation: el
                .child("TempoAutomation")
                .map(|points| decode_points_body(points, ctx))
                .transpose()?,
            markers: el
                .child("Markers")
                .map(|markers| decode_markers_body(markers, ctx))
                .transpose()?,
            lanes: el
                .child("Lanes")
                .map(|lanes| decode_lanes_body(lanes, ctx))
                .transpose()?,
        })
    }
}

// === Scene ===

impl ToElement for Scene {
    fn to_element(&self) -> Result<Element> {
        let mut el = Element::new("Scene");
        write_identity(&mut el, &self.identity);
        if let Some(content) = &self.content {
            el.push(content.to_element()?);
        }
        Ok(el)
    }
}

impl FromElement for Scene {
    fn from_element(el: &Element, ctx: &mut DecodeContext) -> Result<Self> {
        Ok(Scene {
            identity: read_identity(el, ctx, EntityKind::Scene)?,
            content: TIMELINE.decode_single(el, &[], ctx)?,
        })
    }
}

// === MetaData ===

impl ToElement for MetaData {
    fn to_element(&self) -> Result<Element> {
        let mut el = Element::new("MetaData");
        for (tag, value) in self.fields() {
            if let Some(value) = value {
                el.push(Element::new(tag).with_text(value));
            }
        }
        Ok(el)
    }
}

impl FromElement for MetaData {
    fn from_element(el: &Element, ctx: &mut DecodeContext) -> Result<Self> {
        el.expect_name("MetaData")?;
        let mut metadata = MetaData::default();
        for child in &el.children {
            match metadata.field_mut(&child.name) {
                Some(slot) => *slot = Some(child.text.clone().unwrap_or_default()),
                None => ctx.unknown("metadata", &child.name)?,
            }
        }
        Ok(metadata)
    }
}

/// Reject a document whose root is not a project or metadata element.
pub fn document_kind(el: &Element) -> Result<&'static str> {
    match el.name.as_str() {
        "Project" => Ok("project"),
        "MetaData" => Ok("metadata"),
        other => Err(DawError::UnexpectedElement {
            expected: "Project or MetaData".to_string(),
            found: other.to_string(),
        }),
    }
}
