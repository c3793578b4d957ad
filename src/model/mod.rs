//! Entity Model
//!
//! Typed node hierarchy of a project. Shared fields are embedded by value;
//! each polymorphic role is a closed enum. Cross references are stored as
//! identity tokens and are never ownership edges.

pub mod common;
pub mod device;
pub mod document;
pub mod enums;
pub mod parameter;
pub mod structure;
pub mod timeline;
pub mod visit;

pub use common::{FileReference, Id, IdentityFields, NameableFields};
pub use device::{
    BuiltinDevice, BuiltinPayload, Compressor, Device, DeviceFields, EqBand, Equalizer, Limiter,
    NoiseGate, Plugin, PluginFormat,
};
pub use document::{
    Application, Arrangement, MetaData, Project, Scene, Transport, FILE_EXTENSION, FORMAT_NAME,
    METADATA_FILE, PROJECT_FILE,
};
pub use enums::{
    ContentType, DeviceRole, EqBandType, ExpressionType, Interpolation, MixerRole, SendType,
    TimeUnit, Unit,
};
pub use parameter::{
    BoolParameter, EnumParameter, IntegerParameter, Parameter, RealParameter,
    TimeSignatureParameter,
};
pub use structure::{Channel, Lane, Send, Track};
pub use timeline::{
    AutomationTarget, BoolPoint, Clip, ClipSlot, Clips, EnumPoint, IntegerPoint, Lanes, Marker,
    Markers, MediaFile, Note, Notes, Point, Points, RealPoint, TimeSignaturePoint, Timeline,
    TimelineFields, Warp, Warps,
};
pub use visit::{walk_project, EntityRef, ParameterRef, TimelineRef, Visitor};
