//! Track, channel and send encoding

use crate::codec;
use crate::error::{DawError, Result};
use crate::model::{Channel, Lane, Send, Track};
use crate::registry::EntityKind;
use crate::serialize::parameter::{bool_slot, push_bool, push_real, real_slot};
use crate::serialize::resolver::{DEVICE, LANE};
use crate::serialize::{
    read_identity, read_reference, required_int, write_identity, DecodeContext, Element,
    FromElement, ToElement,
};

impl ToElement for Lane {
    fn to_element(&self) -> Result<Element> {
        match self {
            Lane::Track(track) => track.to_element(),
            Lane::Channel(channel) => channel.to_element(),
        }
    }
}

impl FromElement for Lane {
    fn from_element(element: &Element, ctx: &mut DecodeContext) -> Result<Self> {
        LANE.decode(element, ctx)?
            .ok_or_else(|| DawError::UnknownVariant {
                role: "lane".to_string(),
                tag: element.name.clone(),
            })
    }
}

pub fn decode_track_lane(el: &Element, ctx: &mut DecodeContext) -> Result<Lane> {
    Track::from_element(el, ctx).map(Lane::Track)
}

pub fn decode_channel_lane(el: &Element, ctx: &mut DecodeContext) -> Result<Lane> {
    Channel::from_element(el, ctx).map(Lane::Channel)
}

// === Channel ===

fn no_audio_channels() -> DawError {
    DawError::malformed("audioChannels", "0", "a channel needs at least one audio channel")
}

impl ToElement for Channel {
    fn to_element(&self) -> Result<Element> {
        if self.audio_channels == 0 {
            return Err(no_audio_channels());
        }
        let mut el = Element::new("Channel");
        write_identity(&mut el, &self.identity);
        el.set_attr("role", self.role.to_string());
        el.set_attr("audioChannels", self.audio_channels.to_string());
        el.set_opt_attr("solo", codec::encode_bool(self.solo));
        if let Some(destination) = &self.destination {
            el.set_attr("destination", destination.as_str());
        }

        if !self.devices.is_empty() {
            let mut devices = Element::new("Devices");
            for device in &self.devices {
                devices.push(device.to_element()?);
            }
            el.push(devices);
        }
        push_bool(&mut el, "Mute", &self.mute);
        push_real(&mut el, "Pan", &self.pan);
        if !self.sends.is_empty() {
            let mut sends = Element::new("Sends");
            for send in &self.sends {
                sends.push(send.to_element()?);
            }
            el.push(sends);
        }
        push_real(&mut el, "Volume", &self.volume);
        Ok(el)
    }
}

impl FromElement for Channel {
    fn from_element(el: &Element, ctx: &mut DecodeContext) -> Result<Self> {
        let identity = read_identity(el, ctx, EntityKind::Channel)?;
        let role = codec::decode_enum("role", Some(el.required_attr("role")?))?
            .ok_or_else(|| DawError::missing(&el.name, "role"))?;
        let audio_channels: u32 = required_int(el, "audioChannels")?;
        if audio_channels == 0 {
            return Err(no_audio_channels());
        }

        let devices = match el.child("Devices") {
            Some(devices) => DEVICE.decode_children(devices, &[], ctx)?,
            None => Vec::new(),
        };
        let sends = match el.child("Sends") {
            Some(sends) => sends
                .children_named("Send")
                .map(|send| Send::from_element(send, ctx))
                .collect::<Result<Vec<_>>>()?,
            None => Vec::new(),
        };

        Ok(Channel {
            identity,
            role,
            audio_channels,
            solo: codec::decode_bool("solo", el.attr("solo"))?,
            destination: read_reference(el, "destination"),
            devices,
            mute: bool_slot(el, "Mute", ctx)?,
            pan: real_slot(el, "Pan", ctx)?,
            sends,
            volume: real_slot(el, "Volume", ctx)?,
        })
    }
}

// === Send ===

impl ToElement for Send {
    fn to_element(&self) -> Result<Element> {
        let mut el = Element::new("Send");
        write_identity(&mut el, &self.identity);
        el.set_opt_attr("type", codec::encode_enum(self.send_type));
        if let Some(destination) = &self.destination {
            el.set_attr("destination", destination.as_str());
        }
        push_real(&mut el, "Volume", &self.volume);
        push_real(&mut el, "Pan", &self.pan);
        Ok(el)
    }
}

impl FromElement for Send {
    fn from_element(el: &Element, ctx: &mut DecodeContext) -> Result<Self> {
        Ok(Send {
            identity: read_identity(el, ctx, EntityKind::Send)?,
            send_type: codec::decode_enum("type", el.attr("type"))?,
            destination: read_reference(el, "destination"),
            volume: real_slot(el, "Volume", ctx)?,
            pan: real_slot(el, "Pan", ctx)?,
        })
    }
}

// === Track ===

impl ToElement for Track {
    fn to_element(&self) -> Result<Element> {
        let mut el = Element::new("Track");
        write_identity(&mut el, &self.identity);
        el.set_opt_attr("contentType", codec::encode_enum_list(&self.content_types));
        el.set_opt_attr("loaded", codec::encode_bool(self.loaded));
        if let Some(channel) = &self.channel {
            el.push(channel.to_element()?);
        }
        for child in &self.tracks {
            el.push(child.to_element()?);
        }
        Ok(el)
    }
}

impl FromElement for Track {
    fn from_element(el: &Element, ctx: &mut DecodeContext) -> Result<Self> {
        let identity = read_identity(el, ctx, EntityKind::Track)?;
        let channel = el
            .child("Channel")
            .map(|channel| Channel::from_element(channel, ctx))
            .transpose()?;
        let tracks = el
            .children_named("Track")
            .map(|child| Track::from_element(child, ctx))
            .collect::<Result<Vec<_>>>()?;

        Ok(Track {
            identity,
            content_types: codec::decode_enum_list("contentType", el.attr("contentType"))?,
            loaded: codec::decode_bool("loaded", el.attr("loaded"))?,
            channel,
            tracks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BuiltinDevice, ContentType, Device, MixerRole, SendType};
    use crate::registry::IdentityRegistry;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_channel_round_trip() {
        let mut registry = IdentityRegistry::new();
        let bus = Channel::new(&mut registry, MixerRole::Submix);
        let mut channel = Channel::new(&mut registry, MixerRole::Regular).route_to(&bus.identity.id);
        channel.solo = Some(false);
        channel.audio_channels = 1;
        channel
            .devices
            .push(Device::Builtin(BuiltinDevice::equalizer(&mut registry, "EQ")));
        let mut send = Send::new(&mut registry, &bus.identity.id, 0.5);
        send.send_type = Some(SendType::Pre);
        channel.sends.push(send);

        let el = channel.to_element().unwrap();
        let child_names: Vec<_> = el.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(child_names, vec!["Devices", "Mute", "Pan", "Sends", "Volume"]);

        let back = Channel::from_element(&el, &mut DecodeContext::default()).unwrap();
        assert_eq!(back, channel);
    }

    #[test]
    fn test_channel_requires_role_and_channels() {
        let el = Element::new("Channel")
            .with_attr("id", "c0")
            .with_attr("audioChannels", "2");
        let err = Channel::from_element(&el, &mut DecodeContext::default()).unwrap_err();
        assert!(matches!(err, DawError::MissingRequiredField { ref field, .. } if field == "role"));

        let el = Element::new("Channel")
            .with_attr("id", "c0")
            .with_attr("role", "master")
            .with_attr("audioChannels", "0");
        let err = Channel::from_element(&el, &mut DecodeContext::default()).unwrap_err();
        assert_eq!(err.error_code(), "MALFORMED_VALUE");
    }

    #[test]
    fn test_channel_without_audio_channels_is_not_written() {
        let mut registry = IdentityRegistry::new();
        let mut channel = Channel::new(&mut registry, MixerRole::Master);
        channel.audio_channels = 0;
        let err = channel.to_element().unwrap_err();
        assert!(matches!(
            err,
            DawError::MalformedValue { ref field, ref value, .. } if field == "audioChannels" && value == "0"
        ));
    }

    #[test]
    fn test_nested_tracks_round_trip() {
        let mut registry = IdentityRegistry::new();
        let mut folder = Track::new(&mut registry, "Drums");
        folder.content_types = vec![ContentType::Tracks];
        folder.tracks.push(Track::with_channel(
            &mut registry,
            "Kick",
            vec![ContentType::Audio, ContentType::Notes],
            MixerRole::Regular,
        ));
        folder.tracks.push(Track::with_channel(
            &mut registry,
            "Snare",
            vec![ContentType::Audio],
            MixerRole::Regular,
        ));

        let el = folder.to_element().unwrap();
        assert_eq!(el.children_named("Track").count(), 2);
        assert_eq!(el.children[0].attr("contentType"), Some("audio,notes"));

        let back = Track::from_element(&el, &mut DecodeContext::default()).unwrap();
        assert_eq!(back, folder);
    }

    #[test]
    fn test_lane_dispatch() {
        let mut registry = IdentityRegistry::new();
        let lane = Lane::Channel(Channel::new(&mut registry, MixerRole::Master));
        let el = lane.to_element().unwrap();
        let back = Lane::from_element(&el, &mut DecodeContext::default()).unwrap();
        assert_eq!(back, lane);

        let err = Lane::from_element(&Element::new("Folder"), &mut DecodeContext::default())
            .unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_VARIANT");
    }
}
