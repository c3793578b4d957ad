//! Example project used by the `example` command
//!
//! A small but complete session: a master bus with dynamics, a reverb
//! return fed by a send, a synth bass and a drum loop, an arrangement with
//! clips, notes, markers and automation, and a launcher scene.

use chrono::{DateTime, Utc};

use crate::codec;
use crate::model::{
    Application, Arrangement, AutomationTarget, BoolParameter, BuiltinDevice, BuiltinPayload,
    Clip, Clips, ClipSlot, ContentType, Device, DeviceRole, EqBand, EqBandType, FileReference,
    Interpolation, Lane, Lanes, Marker, Markers, MediaFile, MetaData, MixerRole, NameableFields,
    Note, Notes, Plugin, PluginFormat, Point, Points, Project, RealParameter, Scene, Send,
    TimeUnit, Timeline, Track, Transport, Unit, Warp, Warps,
};
use crate::registry::IdentityRegistry;

/// Build the example project with a fresh registry.
pub fn example_project() -> Project {
    let mut registry = IdentityRegistry::new();
    build(&mut registry)
}

/// Metadata for the example, stamped with `written_at`.
pub fn example_metadata(written_at: &DateTime<Utc>) -> MetaData {
    MetaData {
        title: Some("Night Drive".to_string()),
        artist: Some("The Examples".to_string()),
        year: Some(written_at.format("%Y").to_string()),
        genre: Some("Synthwave".to_string()),
        comment: Some(codec::encode_timestamp(written_at)),
        ..Default::default()
    }
}

fn build(registry: &mut IdentityRegistry) -> Project {
    let mut project = Project::new(Application::new("dawproject", env!("CARGO_PKG_VERSION")));
    project.transport = Some(Transport::new(registry, 118.0, 4, 4));

    // === Mixer ===

    let mut master = Track::with_channel(registry, "Master", vec![ContentType::Audio], MixerRole::Master);
    let master_channel = master.channel_id().cloned();
    if let Some(channel) = master.channel.as_mut() {
        channel.devices.push(Device::Builtin(master_eq(registry)));
        channel.devices.push(Device::Builtin(master_compressor(registry)));
    }

    let mut reverb = Track::with_channel(registry, "Reverb", vec![ContentType::Audio], MixerRole::Effect);
    let reverb_channel = reverb.channel_id().cloned();
    if let Some(channel) = reverb.channel.as_mut() {
        let mut plugin = Plugin::new(registry, PluginFormat::Clap, DeviceRole::AudioFx, "Plate Reverb");
        plugin.fields.device_id = Some("org.example.plate-reverb".to_string());
        plugin.fields.device_vendor = Some("Example Audio".to_string());
        plugin.fields.state = Some(FileReference::embedded("plugins/plate-reverb.clap-preset"));
        plugin.plugin_version = Some("2.1.0".to_string());
        channel.devices.push(Device::Plugin(plugin));
        channel.destination = master_channel.clone();
    }

    let mut bass = Track::with_channel(registry, "Bass", vec![ContentType::Notes], MixerRole::Regular);
    bass.identity.nameable.color = Some("#3a7bd5".to_string());
    if let Some(channel) = bass.channel.as_mut() {
        let mut synth = Plugin::new(registry, PluginFormat::Vst3, DeviceRole::Instrument, "Mono Synth");
        synth.fields.device_id = Some("5653544d6f6e6f73796e7468".to_string());
        synth
            .fields
            .parameters
            .push(RealParameter::new(registry, 0.35, Unit::Normalized).into());
        channel.devices.push(Device::Plugin(synth));
        channel.destination = master_channel.clone();
        if let Some(reverb_channel) = &reverb_channel {
            channel.sends.push(Send::new(registry, reverb_channel, 0.25));
        }
    }
    let bass_volume = bass
        .channel
        .as_ref()
        .and_then(|c| c.volume.as_ref())
        .map(|v| v.identity.id.clone());

    let mut drums = Track::with_channel(registry, "Drums", vec![ContentType::Audio], MixerRole::Regular);
    if let Some(channel) = drums.channel.as_mut() {
        channel.destination = master_channel;
    }

    // === Arrangement ===

    let mut arrangement = Arrangement::new(registry);

    let mut tempo = Points::new(registry, AutomationTarget::default());
    tempo.unit = Some(Unit::Bpm);
    tempo.points.push(Point::real(0.0, 118.0, Interpolation::Hold));
    tempo.points.push(Point::real(64.0, 122.0, Interpolation::Linear));
    arrangement.tempo_automation = Some(tempo);

    let mut markers = Markers::new(registry);
    markers.markers.push(Marker::new(0.0, "Intro"));
    markers.markers.push(Marker::new(32.0, "Drop"));
    arrangement.markers = Some(markers);

    let mut riff = Notes::new(registry);
    for (step, key) in [36u32, 36, 43, 41].into_iter().enumerate() {
        riff.notes.push(Note::new(step as f64 * 4.0, 3.5, key, 0.8));
    }
    let riff_id = riff.timeline.identity.id.clone();

    let mut first = Clip::new(Timeline::Notes(riff), 0.0, 16.0);
    first.nameable = NameableFields::named("Riff");
    let repeat = Clip::alias(&riff_id, 16.0, 16.0);
    let mut bass_clips = Clips::with_clips(registry, vec![first, repeat]);
    bass_clips.timeline.track = Some(bass.identity.id.clone());

    let drum_clip = drum_loop(registry);
    let mut drum_clips = Clips::with_clips(registry, vec![drum_clip]);
    drum_clips.timeline.track = Some(drums.identity.id.clone());

    let mut lanes = Lanes::new(registry);
    lanes.lanes.push(Timeline::Clips(bass_clips));
    lanes.lanes.push(Timeline::Clips(drum_clips));
    if let Some(volume) = &bass_volume {
        let mut fade = Points::new(registry, AutomationTarget::parameter(volume));
        fade.timeline.track = Some(bass.identity.id.clone());
        fade.unit = Some(Unit::Linear);
        fade.points.push(Point::real(0.0, 0.0, Interpolation::Linear));
        fade.points.push(Point::real(8.0, 1.0, Interpolation::Linear));
        lanes.lanes.push(Timeline::Points(fade));
    }
    arrangement.lanes = Some(lanes);

    // === Scenes ===

    let mut scene = Scene::new(registry, "Intro");
    let mut slot = ClipSlot::new(registry, Some(Clip::alias(&riff_id, 0.0, 16.0)));
    slot.timeline.track = Some(bass.identity.id.clone());
    let mut scene_lanes = Lanes::new(registry);
    scene_lanes.lanes.push(Timeline::ClipSlot(slot));
    scene.content = Some(Timeline::Lanes(scene_lanes));

    project.structure = vec![
        Lane::Track(bass),
        Lane::Track(drums),
        Lane::Track(reverb),
        Lane::Track(master),
    ];
    project.arrangement = Some(arrangement);
    project.scenes.push(scene);
    project
}

fn master_eq(registry: &mut IdentityRegistry) -> BuiltinDevice {
    let mut eq = BuiltinDevice::equalizer(registry, "Master EQ");
    let band = EqBand {
        band_type: EqBandType::Bell,
        order: None,
        freq: RealParameter::new(registry, 250.0, Unit::Hertz),
        gain: Some(RealParameter::new(registry, -2.5, Unit::Decibel)),
        q: Some(RealParameter::new(registry, 0.9, Unit::Linear)),
        enabled: Some(BoolParameter::new(registry, true)),
    };
    if let BuiltinPayload::Equalizer(payload) = &mut eq.payload {
        payload.bands.push(band);
    }
    eq
}

fn master_compressor(registry: &mut IdentityRegistry) -> BuiltinDevice {
    let mut compressor = BuiltinDevice::compressor(registry, "Glue");
    if let BuiltinPayload::Compressor(payload) = &mut compressor.payload {
        payload.threshold = Some(RealParameter::new(registry, -12.0, Unit::Decibel));
        payload.ratio = Some(RealParameter::new(registry, 2.0, Unit::Linear));
        payload.attack = Some(RealParameter::new(registry, 0.03, Unit::Seconds));
        payload.release = Some(RealParameter::new(registry, 0.2, Unit::Seconds));
        payload.auto_makeup = Some(BoolParameter::new(registry, false));
    }
    compressor
}

/// One bar drum loop stretched from its recorded tempo to the project tempo
fn drum_loop(registry: &mut IdentityRegistry) -> Clip {
    let audio = MediaFile::audio(
        registry,
        FileReference::embedded("audio/drums-loop.wav"),
        48000,
        2,
        2.0,
    );
    let mut warps = Warps::new(registry, Timeline::Audio(audio), TimeUnit::Seconds);
    warps.warps.push(Warp::new(0.0, 0.0));
    warps.warps.push(Warp::new(4.0, 2.0));

    let mut clip = Clip::new(Timeline::Warps(warps), 0.0, 32.0);
    clip.loop_start = Some(0.0);
    clip.loop_end = Some(4.0);
    clip.fade_in_time = Some(0.01);
    clip.fade_out_time = Some(0.01);
    clip
}
