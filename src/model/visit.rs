//! Depth-first traversal of identities and references
//!
//! One walk drives both the identity collection run before encoding and the
//! reference check run after decoding, so the two always agree on which
//! fields are identities and which are references. The same walk backs
//! `Project::resolve`.

use crate::error::Result;
use crate::model::{
    Arrangement, BoolParameter, BuiltinPayload, Channel, Clip, ClipSlot, Clips, Device,
    EnumParameter, Id, IntegerParameter, Lane, Lanes, Markers, MediaFile, Notes, Parameter,
    Points, Project, RealParameter, Scene, Send, TimeSignatureParameter, Timeline, TimelineFields,
    Track, Warps,
};
use crate::registry::EntityKind;

const CHANNEL: &[EntityKind] = &[EntityKind::Channel];
const TRACK: &[EntityKind] = &[EntityKind::Track];
const TIMELINE: &[EntityKind] = &[EntityKind::Timeline];
const PARAMETER: &[EntityKind] = &[EntityKind::Parameter];

// === Entity References ===

/// Borrowed view of any parameter, wherever it is stored
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParameterRef<'a> {
    Real(&'a RealParameter),
    Bool(&'a BoolParameter),
    Integer(&'a IntegerParameter),
    Enum(&'a EnumParameter),
    TimeSignature(&'a TimeSignatureParameter),
}

impl<'a> From<&'a Parameter> for ParameterRef<'a> {
    fn from(param: &'a Parameter) -> Self {
        match param {
            Parameter::Real(p) => ParameterRef::Real(p),
            Parameter::Bool(p) => ParameterRef::Bool(p),
            Parameter::Integer(p) => ParameterRef::Integer(p),
            Parameter::Enum(p) => ParameterRef::Enum(p),
            Parameter::TimeSignature(p) => ParameterRef::TimeSignature(p),
        }
    }
}

/// Borrowed view of any timeline, including the ones an arrangement holds
/// outside a `Timeline` value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimelineRef<'a> {
    Clips(&'a Clips),
    Notes(&'a Notes),
    Markers(&'a Markers),
    Points(&'a Points),
    Lanes(&'a Lanes),
    Warps(&'a Warps),
    Audio(&'a MediaFile),
    Video(&'a MediaFile),
    ClipSlot(&'a ClipSlot),
}

impl<'a> TimelineRef<'a> {
    pub fn fields(&self) -> &'a TimelineFields {
        match *self {
            TimelineRef::Clips(t) => &t.timeline,
            TimelineRef::Notes(t) => &t.timeline,
            TimelineRef::Markers(t) => &t.timeline,
            TimelineRef::Points(t) => &t.timeline,
            TimelineRef::Lanes(t) => &t.timeline,
            TimelineRef::Warps(t) => &t.timeline,
            TimelineRef::Audio(t) | TimelineRef::Video(t) => &t.timeline,
            TimelineRef::ClipSlot(t) => &t.timeline,
        }
    }
}

impl<'a> From<&'a Timeline> for TimelineRef<'a> {
    fn from(timeline: &'a Timeline) -> Self {
        match timeline {
            Timeline::Clips(t) => TimelineRef::Clips(t),
            Timeline::Notes(t) => TimelineRef::Notes(t),
            Timeline::Markers(t) => TimelineRef::Markers(t),
            Timeline::Points(t) => TimelineRef::Points(t),
            Timeline::Lanes(t) => TimelineRef::Lanes(t),
            Timeline::Warps(t) => TimelineRef::Warps(t),
            Timeline::Audio(t) => TimelineRef::Audio(t),
            Timeline::Video(t) => TimelineRef::Video(t),
            Timeline::ClipSlot(t) => TimelineRef::ClipSlot(t),
        }
    }
}

/// The entity owning an identity token
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EntityRef<'a> {
    Track(&'a Track),
    Channel(&'a Channel),
    Send(&'a Send),
    Device(&'a Device),
    Parameter(ParameterRef<'a>),
    Timeline(TimelineRef<'a>),
    Arrangement(&'a Arrangement),
    Scene(&'a Scene),
}

impl EntityRef<'_> {
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityRef::Track(_) => EntityKind::Track,
            EntityRef::Channel(_) => EntityKind::Channel,
            EntityRef::Send(_) => EntityKind::Send,
            EntityRef::Device(_) => EntityKind::Device,
            EntityRef::Parameter(_) => EntityKind::Parameter,
            EntityRef::Timeline(_) => EntityKind::Timeline,
            EntityRef::Arrangement(_) => EntityKind::Arrangement,
            EntityRef::Scene(_) => EntityKind::Scene,
        }
    }
}

// === Walk ===

/// Callbacks for identities and references met during a walk
pub trait Visitor<'a> {
    /// `entity` owns `id`
    fn identity(&mut self, id: &'a Id, entity: EntityRef<'a>) -> Result<()>;

    /// A non-owning reference stored in `field`
    fn reference(&mut self, id: &'a Id, field: &'static str, expected: &'static [EntityKind])
        -> Result<()>;
}

pub fn walk_project<'a, V: Visitor<'a>>(project: &'a Project, visitor: &mut V) -> Result<()> {
    if let Some(transport) = &project.transport {
        if let Some(tempo) = &transport.tempo {
            walk_real(tempo, visitor)?;
        }
        if let Some(ts) = &transport.time_signature {
            walk_time_signature(ts, visitor)?;
        }
    }

    for lane in &project.structure {
        walk_lane(lane, visitor)?;
    }

    if let Some(arrangement) = &project.arrangement {
        visitor.identity(&arrangement.identity.id, EntityRef::Arrangement(arrangement))?;
        let automation = [
            &arrangement.time_signature_automation,
            &arrangement.tempo_automation,
        ];
        for points in automation.into_iter().flatten() {
            walk_points(points, visitor)?;
        }
        if let Some(markers) = &arrangement.markers {
            walk_fields(TimelineRef::Markers(markers), visitor)?;
        }
        if let Some(lanes) = &arrangement.lanes {
            walk_lanes(lanes, visitor)?;
        }
    }

    for scene in &project.scenes {
        visitor.identity(&scene.identity.id, EntityRef::Scene(scene))?;
        if let Some(content) = &scene.content {
            walk_timeline(content, visitor)?;
        }
    }
    Ok(())
}

pub fn walk_lane<'a, V: Visitor<'a>>(lane: &'a Lane, visitor: &mut V) -> Result<()> {
    match lane {
        Lane::Track(track) => walk_track(track, visitor),
        Lane::Channel(channel) => walk_channel(channel, visitor),
    }
}

fn walk_track<'a, V: Visitor<'a>>(track: &'a Track, visitor: &mut V) -> Result<()> {
    visitor.identity(&track.identity.id, EntityRef::Track(track))?;
    if let Some(channel) = &track.channel {
        walk_channel(channel, visitor)?;
    }
    for child in &track.tracks {
        walk_track(child, visitor)?;
    }
    Ok(())
}

fn walk_channel<'a, V: Visitor<'a>>(channel: &'a Channel, visitor: &mut V) -> Result<()> {
    visitor.identity(&channel.identity.id, EntityRef::Channel(channel))?;
    if let Some(destination) = &channel.destination {
        visitor.reference(destination, "destination", CHANNEL)?;
    }
    for device in &channel.devices {
        walk_device(device, visitor)?;
    }
    if let Some(mute) = &channel.mute {
        walk_bool(mute, visitor)?;
    }
    if let Some(pan) = &channel.pan {
        walk_real(pan, visitor)?;
    }
    for send in &channel.sends {
        walk_send(send, visitor)?;
    }
    if let Some(volume) = &channel.volume {
        walk_real(volume, visitor)?;
    }
    Ok(())
}

fn walk_send<'a, V: Visitor<'a>>(send: &'a Send, visitor: &mut V) -> Result<()> {
    visitor.identity(&send.identity.id, EntityRef::Send(send))?;
    if let Some(destination) = &send.destination {
        visitor.reference(destination, "destination", CHANNEL)?;
    }
    for param in [&send.volume, &send.pan].into_iter().flatten() {
        walk_real(param, visitor)?;
    }
    Ok(())
}

pub fn walk_device<'a, V: Visitor<'a>>(device: &'a Device, visitor: &mut V) -> Result<()> {
    let fields = device.fields();
    visitor.identity(&fields.identity.id, EntityRef::Device(device))?;
    for param in &fields.parameters {
        walk_parameter(param, visitor)?;
    }
    if let Some(enabled) = &fields.enabled {
        walk_bool(enabled, visitor)?;
    }

    let Device::Builtin(builtin) = device else {
        return Ok(());
    };
    match &builtin.payload {
        BuiltinPayload::Generic => {}
        BuiltinPayload::Equalizer(eq) => {
            for band in &eq.bands {
                walk_real(&band.freq, visitor)?;
                for param in [&band.gain, &band.q].into_iter().flatten() {
                    walk_real(param, visitor)?;
                }
                if let Some(enabled) = &band.enabled {
                    walk_bool(enabled, visitor)?;
                }
            }
            for param in [&eq.input_gain, &eq.output_gain].into_iter().flatten() {
                walk_real(param, visitor)?;
            }
        }
        BuiltinPayload::Compressor(comp) => {
            let reals = [
                &comp.attack,
                &comp.input_gain,
                &comp.output_gain,
                &comp.ratio,
                &comp.release,
                &comp.threshold,
            ];
            for param in reals.into_iter().flatten() {
                walk_real(param, visitor)?;
            }
            if let Some(auto_makeup) = &comp.auto_makeup {
                walk_bool(auto_makeup, visitor)?;
            }
        }
        BuiltinPayload::Limiter(limiter) => {
            let reals = [
                &limiter.attack,
                &limiter.input_gain,
                &limiter.output_gain,
                &limiter.release,
                &limiter.threshold,
            ];
            for param in reals.into_iter().flatten() {
                walk_real(param, visitor)?;
            }
        }
        BuiltinPayload::NoiseGate(gate) => {
            let reals = [
                &gate.attack,
                &gate.range,
                &gate.ratio,
                &gate.release,
                &gate.threshold,
            ];
            for param in reals.into_iter().flatten() {
                walk_real(param, visitor)?;
            }
        }
    }
    Ok(())
}

pub fn walk_parameter<'a, V: Visitor<'a>>(param: &'a Parameter, visitor: &mut V) -> Result<()> {
    match param.id() {
        Some(id) => visitor.identity(id, EntityRef::Parameter(param.into())),
        None => Ok(()),
    }
}

fn walk_real<'a, V: Visitor<'a>>(param: &'a RealParameter, visitor: &mut V) -> Result<()> {
    visitor.identity(&param.identity.id, EntityRef::Parameter(ParameterRef::Real(param)))
}

fn walk_bool<'a, V: Visitor<'a>>(param: &'a BoolParameter, visitor: &mut V) -> Result<()> {
    visitor.identity(&param.identity.id, EntityRef::Parameter(ParameterRef::Bool(param)))
}

fn walk_time_signature<'a, V: Visitor<'a>>(
    param: &'a TimeSignatureParameter,
    visitor: &mut V,
) -> Result<()> {
    match &param.id {
        Some(id) => visitor.identity(id, EntityRef::Parameter(ParameterRef::TimeSignature(param))),
        None => Ok(()),
    }
}

pub fn walk_timeline<'a, V: Visitor<'a>>(timeline: &'a Timeline, visitor: &mut V) -> Result<()> {
    match timeline {
        Timeline::Clips(clips) => {
            walk_fields(TimelineRef::Clips(clips), visitor)?;
            for clip in &clips.clips {
                walk_clip(clip, visitor)?;
            }
        }
        Timeline::Notes(notes) => {
            walk_fields(TimelineRef::Notes(notes), visitor)?;
            for note in &notes.notes {
                if let Some(content) = &note.content {
                    walk_timeline(content, visitor)?;
                }
            }
        }
        Timeline::Points(points) => walk_points(points, visitor)?,
        Timeline::Lanes(lanes) => walk_lanes(lanes, visitor)?,
        Timeline::Warps(warps) => {
            walk_fields(TimelineRef::Warps(warps), visitor)?;
            if let Some(content) = &warps.content {
                walk_timeline(content, visitor)?;
            }
        }
        Timeline::ClipSlot(slot) => {
            walk_fields(TimelineRef::ClipSlot(slot), visitor)?;
            if let Some(clip) = &slot.clip {
                walk_clip(clip, visitor)?;
            }
        }
        Timeline::Markers(_) | Timeline::Audio(_) | Timeline::Video(_) => {
            walk_fields(timeline.into(), visitor)?
        }
    }
    Ok(())
}

fn walk_fields<'a, V: Visitor<'a>>(timeline: TimelineRef<'a>, visitor: &mut V) -> Result<()> {
    let fields = timeline.fields();
    visitor.identity(&fields.identity.id, EntityRef::Timeline(timeline))?;
    if let Some(track) = &fields.track {
        visitor.reference(track, "track", TRACK)?;
    }
    Ok(())
}

fn walk_points<'a, V: Visitor<'a>>(points: &'a Points, visitor: &mut V) -> Result<()> {
    walk_fields(TimelineRef::Points(points), visitor)?;
    if let Some(parameter) = &points.target.parameter {
        visitor.reference(parameter, "parameter", PARAMETER)?;
    }
    Ok(())
}

fn walk_lanes<'a, V: Visitor<'a>>(lanes: &'a Lanes, visitor: &mut V) -> Result<()> {
    walk_fields(TimelineRef::Lanes(lanes), visitor)?;
    for lane in &lanes.lanes {
        walk_timeline(lane, visitor)?;
    }
    Ok(())
}

fn walk_clip<'a, V: Visitor<'a>>(clip: &'a Clip, visitor: &mut V) -> Result<()> {
    if let Some(reference) = &clip.reference {
        visitor.reference(reference, "reference", TIMELINE)?;
    }
    if let Some(content) = &clip.content {
        walk_timeline(content, visitor)?;
    }
    Ok(())
}

struct Finder<'a, 'b> {
    target: &'b Id,
    found: Option<EntityRef<'a>>,
}

impl<'a> Visitor<'a> for Finder<'a, '_> {
    fn identity(&mut self, id: &'a Id, entity: EntityRef<'a>) -> Result<()> {
        if self.found.is_none() && id == self.target {
            self.found = Some(entity);
        }
        Ok(())
    }

    fn reference(&mut self, _: &'a Id, _: &'static str, _: &'static [EntityKind]) -> Result<()> {
        Ok(())
    }
}

/// First entity in `project` owning `id`
pub fn find_entity<'a>(project: &'a Project, id: &Id) -> Option<EntityRef<'a>> {
    let mut finder = Finder {
        target: id,
        found: None,
    };
    walk_project(project, &mut finder).ok()?;
    finder.found
}
