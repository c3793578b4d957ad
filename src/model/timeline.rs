//! Timeline family
//!
//! Every timeline is referenceable and carries an optional back-reference to
//! the track it belongs to. Clips and notes own nested timelines as content,
//! so the structure can nest arbitrarily deep.

use crate::model::{
    ExpressionType, FileReference, Id, IdentityFields, Interpolation, NameableFields, TimeUnit,
    Unit,
};
use crate::registry::{EntityKind, IdentityRegistry};

/// Fields shared by every timeline variant
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineFields {
    pub identity: IdentityFields,
    /// Track this timeline belongs to
    pub track: Option<Id>,
    pub time_unit: Option<TimeUnit>,
}

impl TimelineFields {
    pub fn new(registry: &mut IdentityRegistry) -> Self {
        Self {
            identity: IdentityFields::assign(registry, EntityKind::Timeline),
            track: None,
            time_unit: None,
        }
    }

    pub fn in_unit(mut self, unit: TimeUnit) -> Self {
        self.time_unit = Some(unit);
        self
    }
}

/// Closed set of timeline kinds
#[derive(Debug, Clone, PartialEq)]
pub enum Timeline {
    Clips(Clips),
    Notes(Notes),
    Markers(Markers),
    Points(Points),
    Lanes(Lanes),
    Warps(Warps),
    Audio(MediaFile),
    Video(MediaFile),
    ClipSlot(ClipSlot),
}

impl Timeline {
    pub fn fields(&self) -> &TimelineFields {
        match self {
            Timeline::Clips(t) => &t.timeline,
            Timeline::Notes(t) => &t.timeline,
            Timeline::Markers(t) => &t.timeline,
            Timeline::Points(t) => &t.timeline,
            Timeline::Lanes(t) => &t.timeline,
            Timeline::Warps(t) => &t.timeline,
            Timeline::Audio(t) | Timeline::Video(t) => &t.timeline,
            Timeline::ClipSlot(t) => &t.timeline,
        }
    }

    pub fn fields_mut(&mut self) -> &mut TimelineFields {
        match self {
            Timeline::Clips(t) => &mut t.timeline,
            Timeline::Notes(t) => &mut t.timeline,
            Timeline::Markers(t) => &mut t.timeline,
            Timeline::Points(t) => &mut t.timeline,
            Timeline::Lanes(t) => &mut t.timeline,
            Timeline::Warps(t) => &mut t.timeline,
            Timeline::Audio(t) | Timeline::Video(t) => &mut t.timeline,
            Timeline::ClipSlot(t) => &mut t.timeline,
        }
    }

    pub fn id(&self) -> &Id {
        &self.fields().identity.id
    }

    /// Element tag of this variant
    pub fn tag(&self) -> &'static str {
        match self {
            Timeline::Clips(_) => "Clips",
            Timeline::Notes(_) => "Notes",
            Timeline::Markers(_) => "Markers",
            Timeline::Points(_) => "Points",
            Timeline::Lanes(_) => "Lanes",
            Timeline::Warps(_) => "Warps",
            Timeline::Audio(_) => "Audio",
            Timeline::Video(_) => "Video",
            Timeline::ClipSlot(_) => "ClipSlot",
        }
    }
}

// === Clips ===

#[derive(Debug, Clone, PartialEq)]
pub struct Clips {
    pub timeline: TimelineFields,
    pub clips: Vec<Clip>,
}

impl Clips {
    pub fn new(registry: &mut IdentityRegistry) -> Self {
        Self {
            timeline: TimelineFields::new(registry),
            clips: Vec::new(),
        }
    }

    pub fn with_clips(registry: &mut IdentityRegistry, clips: Vec<Clip>) -> Self {
        Self {
            timeline: TimelineFields::new(registry),
            clips,
        }
    }
}

/// A region on a timeline. Its content is either owned (`content`) or an
/// alias of another timeline (`reference`).
#[derive(Debug, Clone, PartialEq)]
pub struct Clip {
    pub nameable: NameableFields,
    pub time: f64,
    pub duration: Option<f64>,
    pub content_time_unit: Option<TimeUnit>,
    pub play_start: Option<f64>,
    pub play_stop: Option<f64>,
    pub loop_start: Option<f64>,
    pub loop_end: Option<f64>,
    pub fade_time_unit: Option<TimeUnit>,
    pub fade_in_time: Option<f64>,
    pub fade_out_time: Option<f64>,
    pub enable: Option<bool>,
    pub content: Option<Box<Timeline>>,
    pub reference: Option<Id>,
}

impl Clip {
    pub fn new(content: Timeline, time: f64, duration: f64) -> Self {
        Self {
            content: Some(Box::new(content)),
            ..Self::empty(time, duration)
        }
    }

    /// Clip playing another timeline's content
    pub fn alias(reference: &Id, time: f64, duration: f64) -> Self {
        Self {
            reference: Some(reference.clone()),
            ..Self::empty(time, duration)
        }
    }

    fn empty(time: f64, duration: f64) -> Self {
        Self {
            nameable: NameableFields::default(),
            time,
            duration: Some(duration),
            content_time_unit: None,
            play_start: None,
            play_stop: None,
            loop_start: None,
            loop_end: None,
            fade_time_unit: None,
            fade_in_time: None,
            fade_out_time: None,
            enable: None,
            content: None,
            reference: None,
        }
    }
}

// === Notes ===

#[derive(Debug, Clone, PartialEq)]
pub struct Notes {
    pub timeline: TimelineFields,
    pub notes: Vec<Note>,
}

impl Notes {
    pub fn new(registry: &mut IdentityRegistry) -> Self {
        Self {
            timeline: TimelineFields::new(registry),
            notes: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub time: f64,
    pub duration: f64,
    /// MIDI channel
    pub channel: Option<u32>,
    pub key: u32,
    /// Note-on velocity, 0.0 to 1.0
    pub velocity: Option<f64>,
    pub release_velocity: Option<f64>,
    /// Per-note expression lanes
    pub content: Option<Box<Timeline>>,
}

impl Note {
    pub fn new(time: f64, duration: f64, key: u32, velocity: f64) -> Self {
        Self {
            time,
            duration,
            channel: Some(0),
            key,
            velocity: Some(velocity),
            release_velocity: None,
            content: None,
        }
    }
}

// === Markers ===

#[derive(Debug, Clone, PartialEq)]
pub struct Markers {
    pub timeline: TimelineFields,
    pub markers: Vec<Marker>,
}

impl Markers {
    pub fn new(registry: &mut IdentityRegistry) -> Self {
        Self {
            timeline: TimelineFields::new(registry),
            markers: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub nameable: NameableFields,
    pub time: f64,
}

impl Marker {
    pub fn new(time: f64, name: impl Into<String>) -> Self {
        Self {
            nameable: NameableFields::named(name),
            time,
        }
    }
}

// === Points ===

/// What an automation lane controls
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AutomationTarget {
    pub parameter: Option<Id>,
    pub expression: Option<ExpressionType>,
    pub channel: Option<u32>,
    pub key: Option<u32>,
    pub controller: Option<u32>,
}

impl AutomationTarget {
    pub fn parameter(id: &Id) -> Self {
        Self {
            parameter: Some(id.clone()),
            ..Default::default()
        }
    }

    pub fn expression(expression: ExpressionType) -> Self {
        Self {
            expression: Some(expression),
            ..Default::default()
        }
    }
}

/// Automation lane. Points are expected in time order; that is not checked.
#[derive(Debug, Clone, PartialEq)]
pub struct Points {
    pub timeline: TimelineFields,
    pub target: AutomationTarget,
    pub points: Vec<Point>,
    pub unit: Option<Unit>,
}

impl Points {
    pub fn new(registry: &mut IdentityRegistry, target: AutomationTarget) -> Self {
        Self {
            timeline: TimelineFields::new(registry),
            target,
            points: Vec::new(),
            unit: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RealPoint {
    pub time: f64,
    pub value: f64,
    pub interpolation: Option<Interpolation>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoolPoint {
    pub time: f64,
    pub value: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntegerPoint {
    pub time: f64,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumPoint {
    pub time: f64,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimeSignaturePoint {
    pub time: f64,
    pub numerator: u32,
    pub denominator: u32,
}

/// Closed set of automation point kinds
#[derive(Debug, Clone, PartialEq)]
pub enum Point {
    Real(RealPoint),
    Bool(BoolPoint),
    Integer(IntegerPoint),
    Enum(EnumPoint),
    TimeSignature(TimeSignaturePoint),
}

impl Point {
    pub fn real(time: f64, value: f64, interpolation: Interpolation) -> Self {
        Point::Real(RealPoint {
            time,
            value,
            interpolation: Some(interpolation),
        })
    }

    pub fn time(&self) -> f64 {
        match self {
            Point::Real(p) => p.time,
            Point::Bool(p) => p.time,
            Point::Integer(p) => p.time,
            Point::Enum(p) => p.time,
            Point::TimeSignature(p) => p.time,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Point::Real(_) => "RealPoint",
            Point::Bool(_) => "BoolPoint",
            Point::Integer(_) => "IntegerPoint",
            Point::Enum(_) => "EnumPoint",
            Point::TimeSignature(_) => "TimeSignaturePoint",
        }
    }
}

// === Lanes ===

/// Parallel timelines sharing one time base
#[derive(Debug, Clone, PartialEq)]
pub struct Lanes {
    pub timeline: TimelineFields,
    pub lanes: Vec<Timeline>,
}

impl Lanes {
    pub fn new(registry: &mut IdentityRegistry) -> Self {
        Self {
            timeline: TimelineFields::new(registry),
            lanes: Vec::new(),
        }
    }
}

// === Warps ===

/// Time-stretch map between timeline time and content time
#[derive(Debug, Clone, PartialEq)]
pub struct Warps {
    pub timeline: TimelineFields,
    pub content_time_unit: TimeUnit,
    pub content: Option<Box<Timeline>>,
    pub warps: Vec<Warp>,
}

impl Warps {
    pub fn new(
        registry: &mut IdentityRegistry,
        content: Timeline,
        content_time_unit: TimeUnit,
    ) -> Self {
        Self {
            timeline: TimelineFields::new(registry),
            content_time_unit,
            content: Some(Box::new(content)),
            warps: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Warp {
    pub time: f64,
    pub content_time: f64,
}

impl Warp {
    pub fn new(time: f64, content_time: f64) -> Self {
        Self { time, content_time }
    }
}

// === Media ===

/// Audio or video file placed on a timeline
#[derive(Debug, Clone, PartialEq)]
pub struct MediaFile {
    pub timeline: TimelineFields,
    /// Duration in seconds
    pub duration: f64,
    /// Required for audio
    pub sample_rate: Option<u32>,
    /// Required for audio
    pub channels: Option<u32>,
    /// Name of the time-stretch algorithm
    pub algorithm: Option<String>,
    pub file: FileReference,
}

impl MediaFile {
    pub fn audio(
        registry: &mut IdentityRegistry,
        file: FileReference,
        sample_rate: u32,
        channels: u32,
        duration: f64,
    ) -> Self {
        Self {
            timeline: TimelineFields::new(registry).in_unit(TimeUnit::Seconds),
            duration,
            sample_rate: Some(sample_rate),
            channels: Some(channels),
            algorithm: None,
            file,
        }
    }
}

// === Clip Slots ===

/// Clip launcher slot
#[derive(Debug, Clone, PartialEq)]
pub struct ClipSlot {
    pub timeline: TimelineFields,
    pub clip: Option<Clip>,
    pub has_stop: Option<bool>,
}

impl ClipSlot {
    pub fn new(registry: &mut IdentityRegistry, clip: Option<Clip>) -> Self {
        Self {
            timeline: TimelineFields::new(registry),
            clip,
            has_stop: None,
        }
    }
}
