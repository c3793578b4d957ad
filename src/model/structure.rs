//! Structural family: tracks, channels and sends

use crate::model::{
    BoolParameter, ContentType, Device, Id, IdentityFields, MixerRole, RealParameter, SendType,
};
use crate::registry::{EntityKind, IdentityRegistry};

/// Top level entry of the project structure
#[derive(Debug, Clone, PartialEq)]
pub enum Lane {
    Track(Track),
    Channel(Channel),
}

impl Lane {
    pub fn id(&self) -> &Id {
        match self {
            Lane::Track(t) => &t.identity.id,
            Lane::Channel(c) => &c.identity.id,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Lane::Track(_) => "Track",
            Lane::Channel(_) => "Channel",
        }
    }
}

/// Mixer channel strip
#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    pub identity: IdentityFields,
    pub role: MixerRole,
    /// Number of audio channels (1 mono, 2 stereo)
    pub audio_channels: u32,
    pub solo: Option<bool>,
    /// Channel this one is routed into
    pub destination: Option<Id>,
    pub devices: Vec<Device>,
    pub mute: Option<BoolParameter>,
    pub pan: Option<RealParameter>,
    pub sends: Vec<Send>,
    pub volume: Option<RealParameter>,
}

impl Channel {
    /// Stereo channel with unity volume, centered pan and mute off
    pub fn new(registry: &mut IdentityRegistry, role: MixerRole) -> Self {
        let identity = IdentityFields::assign(registry, EntityKind::Channel);
        Self {
            identity,
            role,
            audio_channels: 2,
            solo: None,
            destination: None,
            devices: Vec::new(),
            mute: Some(BoolParameter::new(registry, false)),
            pan: Some(RealParameter::pan(registry, 0.5)),
            sends: Vec::new(),
            volume: Some(RealParameter::gain(registry, 1.0)),
        }
    }

    pub fn route_to(mut self, destination: &Id) -> Self {
        self.destination = Some(destination.clone());
        self
    }
}

/// Auxiliary send from a channel to another channel
#[derive(Debug, Clone, PartialEq)]
pub struct Send {
    pub identity: IdentityFields,
    pub send_type: Option<SendType>,
    pub destination: Option<Id>,
    pub volume: Option<RealParameter>,
    pub pan: Option<RealParameter>,
}

impl Send {
    pub fn new(registry: &mut IdentityRegistry, destination: &Id, level: f64) -> Self {
        let identity = IdentityFields::assign(registry, EntityKind::Send);
        Self {
            identity,
            send_type: Some(SendType::Post),
            destination: Some(destination.clone()),
            volume: Some(RealParameter::gain(registry, level)),
            pan: None,
        }
    }
}

/// Track in the structure tree. Tracks nest to form folders.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub identity: IdentityFields,
    pub content_types: Vec<ContentType>,
    pub loaded: Option<bool>,
    pub channel: Option<Channel>,
    pub tracks: Vec<Track>,
}

impl Track {
    pub fn new(registry: &mut IdentityRegistry, name: impl Into<String>) -> Self {
        Self {
            identity: IdentityFields::assign(registry, EntityKind::Track).with_name(name),
            content_types: Vec::new(),
            loaded: Some(true),
            channel: None,
            tracks: Vec::new(),
        }
    }

    /// Track with its own channel
    pub fn with_channel(
        registry: &mut IdentityRegistry,
        name: impl Into<String>,
        content_types: Vec<ContentType>,
        role: MixerRole,
    ) -> Self {
        let mut track = Self::new(registry, name);
        track.content_types = content_types;
        track.channel = Some(Channel::new(registry, role));
        track
    }

    pub fn channel_id(&self) -> Option<&Id> {
        self.channel.as_ref().map(|c| &c.identity.id)
    }
}
