//! Device family
//!
//! A device is either one of the format's built-in processors or a plug-in.
//! `device_name` and `device_role` are mandatory on the wire; they are
//! optional here so that an incomplete device can be built and then refused
//! by the encoder.

use crate::model::{
    BoolParameter, DeviceRole, EqBandType, FileReference, Id, IdentityFields, Parameter,
    RealParameter,
};
use crate::registry::{EntityKind, IdentityRegistry};

/// Fields shared by every device
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceFields {
    pub identity: IdentityFields,
    pub device_role: Option<DeviceRole>,
    pub device_name: Option<String>,
    /// Vendor specific identifier, e.g. a VST3 class id
    pub device_id: Option<String>,
    pub device_vendor: Option<String>,
    pub loaded: Option<bool>,
    pub enabled: Option<BoolParameter>,
    /// Persisted plug-in state
    pub state: Option<FileReference>,
    /// Parameters exposed for automation
    pub parameters: Vec<Parameter>,
}

impl DeviceFields {
    pub fn new(registry: &mut IdentityRegistry, role: DeviceRole, name: impl Into<String>) -> Self {
        Self {
            identity: IdentityFields::assign(registry, EntityKind::Device),
            device_role: Some(role),
            device_name: Some(name.into()),
            device_id: None,
            device_vendor: None,
            loaded: Some(true),
            enabled: None,
            state: None,
            parameters: Vec::new(),
        }
    }
}

/// Closed set of device kinds
#[derive(Debug, Clone, PartialEq)]
pub enum Device {
    Builtin(BuiltinDevice),
    Plugin(Plugin),
}

impl Device {
    pub fn fields(&self) -> &DeviceFields {
        match self {
            Device::Builtin(d) => &d.fields,
            Device::Plugin(d) => &d.fields,
        }
    }

    pub fn fields_mut(&mut self) -> &mut DeviceFields {
        match self {
            Device::Builtin(d) => &mut d.fields,
            Device::Plugin(d) => &mut d.fields,
        }
    }

    pub fn id(&self) -> &Id {
        &self.fields().identity.id
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Device::Builtin(d) => d.payload.tag(),
            Device::Plugin(d) => d.format.tag(),
        }
    }
}

/// A device whose processing is defined by the format itself
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltinDevice {
    pub fields: DeviceFields,
    pub payload: BuiltinPayload,
}

impl BuiltinDevice {
    pub fn equalizer(registry: &mut IdentityRegistry, name: impl Into<String>) -> Self {
        Self {
            fields: DeviceFields::new(registry, DeviceRole::AudioFx, name),
            payload: BuiltinPayload::Equalizer(Equalizer::default()),
        }
    }

    pub fn compressor(registry: &mut IdentityRegistry, name: impl Into<String>) -> Self {
        Self {
            fields: DeviceFields::new(registry, DeviceRole::AudioFx, name),
            payload: BuiltinPayload::Compressor(Compressor::default()),
        }
    }
}

/// Typed payload of a built-in device
#[derive(Debug, Clone, PartialEq)]
pub enum BuiltinPayload {
    /// Built-in device with no typed parameters
    Generic,
    Equalizer(Equalizer),
    Compressor(Compressor),
    Limiter(Limiter),
    NoiseGate(NoiseGate),
}

impl BuiltinPayload {
    pub fn tag(&self) -> &'static str {
        match self {
            BuiltinPayload::Generic => "BuiltinDevice",
            BuiltinPayload::Equalizer(_) => "Equalizer",
            BuiltinPayload::Compressor(_) => "Compressor",
            BuiltinPayload::Limiter(_) => "Limiter",
            BuiltinPayload::NoiseGate(_) => "NoiseGate",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Equalizer {
    pub bands: Vec<EqBand>,
    pub input_gain: Option<RealParameter>,
    pub output_gain: Option<RealParameter>,
}

/// One filter band. Bands are not referenceable; their parameters are.
#[derive(Debug, Clone, PartialEq)]
pub struct EqBand {
    pub band_type: EqBandType,
    /// Filter order (slope)
    pub order: Option<u32>,
    pub freq: RealParameter,
    pub gain: Option<RealParameter>,
    pub q: Option<RealParameter>,
    pub enabled: Option<BoolParameter>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Compressor {
    pub threshold: Option<RealParameter>,
    pub ratio: Option<RealParameter>,
    pub attack: Option<RealParameter>,
    pub release: Option<RealParameter>,
    pub input_gain: Option<RealParameter>,
    pub output_gain: Option<RealParameter>,
    pub auto_makeup: Option<BoolParameter>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Limiter {
    pub threshold: Option<RealParameter>,
    pub input_gain: Option<RealParameter>,
    pub output_gain: Option<RealParameter>,
    pub attack: Option<RealParameter>,
    pub release: Option<RealParameter>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoiseGate {
    pub threshold: Option<RealParameter>,
    pub ratio: Option<RealParameter>,
    pub attack: Option<RealParameter>,
    pub release: Option<RealParameter>,
    /// Attenuation applied while closed
    pub range: Option<RealParameter>,
}

/// Plug-in format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginFormat {
    Vst2,
    Vst3,
    Clap,
    Au,
}

impl PluginFormat {
    pub fn tag(&self) -> &'static str {
        match self {
            PluginFormat::Vst2 => "Vst2Plugin",
            PluginFormat::Vst3 => "Vst3Plugin",
            PluginFormat::Clap => "ClapPlugin",
            PluginFormat::Au => "AuPlugin",
        }
    }
}

/// Externally defined device
#[derive(Debug, Clone, PartialEq)]
pub struct Plugin {
    pub fields: DeviceFields,
    pub format: PluginFormat,
    pub plugin_version: Option<String>,
}

impl Plugin {
    pub fn new(
        registry: &mut IdentityRegistry,
        format: PluginFormat,
        role: DeviceRole,
        name: impl Into<String>,
    ) -> Self {
        Self {
            fields: DeviceFields::new(registry, role, name),
            format,
            plugin_version: None,
        }
    }
}
