//! Round-trip Tests
//!
//! Encoding and decoding whole projects through element trees and XML text.

use dawproject::cli::example::{example_metadata, example_project};
use dawproject::model::{
    Application, Channel, ContentType, Device, Lane, MixerRole, Project, RealParameter, Send,
    Timeline, Track, Unit,
};
use dawproject::serialize::{
    decode_project, encode_project, read_metadata, read_project, write_metadata, write_project,
    xml, DecodeOptions, WriteOptions,
};
use dawproject::{IdentityRegistry, MetaData};
use pretty_assertions::assert_eq;

const SESSION: &str = include_str!("fixtures/session.xml");

fn reload(project: &Project) -> Project {
    let text = write_project(project, &WriteOptions::default()).unwrap();
    read_project(&text, &DecodeOptions::default()).unwrap().value
}

// === Whole Project ===

#[test]
fn test_example_project_round_trip() {
    let project = example_project();
    assert_eq!(reload(&project), project);
}

#[test]
fn test_compact_output_round_trip() {
    let project = example_project();
    let text = write_project(&project, &WriteOptions::compact()).unwrap();
    assert!(!text.contains('\n'));
    assert!(!text.starts_with("<?xml"));
    let back = read_project(&text, &DecodeOptions::default()).unwrap();
    assert_eq!(back.value, project);
}

#[test]
fn test_reencoded_tree_matches_document() {
    let tree = xml::parse(SESSION).unwrap();
    let decoded = decode_project(&tree).unwrap();
    let reencoded = encode_project(&decoded.value).unwrap();
    assert_eq!(reencoded.normalized(), tree.normalized());
}

#[test]
fn test_session_contents() {
    let decoded = read_project(SESSION, &DecodeOptions::default()).unwrap();
    let project = &decoded.value;

    assert_eq!(project.version, "1.0");
    assert_eq!(project.application.name, "Test Host");
    let transport = project.transport.as_ref().unwrap();
    let ts = transport.time_signature.as_ref().unwrap();
    assert_eq!((ts.numerator, ts.denominator), (7, 8));
    assert!(ts.id.is_none());

    let tracks = project.tracks();
    let names: Vec<_> = tracks.iter().filter_map(|t| t.identity.name()).collect();
    assert_eq!(names, vec!["Lead", "Master"]);
    assert_eq!(decoded.registry.len(), 16);

    let lead = tracks[0];
    assert_eq!(lead.content_types, vec![ContentType::Notes]);
    let channel = lead.channel.as_ref().unwrap();
    match &channel.devices[0] {
        Device::Plugin(plugin) => {
            assert_eq!(plugin.fields.device_id.as_deref(), Some("ABCDEF"));
            assert_eq!(plugin.fields.state.as_ref().unwrap().path, "plugins/poly.vstpreset");
        }
        other => panic!("expected a plug-in, got {:?}", other),
    }

    let lanes = project.arrangement.as_ref().unwrap().lanes.as_ref().unwrap();
    assert_eq!(lanes.lanes.len(), 2);
    match &lanes.lanes[0] {
        Timeline::Clips(clips) => {
            assert_eq!(clips.clips.len(), 2);
            assert!(clips.clips[0].content.is_some());
            assert_eq!(clips.clips[1].reference.as_ref().unwrap().as_str(), "id12");
        }
        other => panic!("expected clips, got {:?}", other),
    }
}

// === Values ===

#[test]
fn test_non_finite_values_survive() {
    let decoded = read_project(SESSION, &DecodeOptions::default()).unwrap();
    let master = decoded.value.master_channel().unwrap();
    let volume = master.volume.as_ref().unwrap();
    assert_eq!(volume.value, Some(f64::NEG_INFINITY));
    assert_eq!(volume.max, Some(f64::INFINITY));
    assert!(volume.min.is_none());

    let text = write_project(&decoded.value, &WriteOptions::default()).unwrap();
    assert!(text.contains(r#"value="-inf""#));
    assert!(text.contains(r#"max="inf""#));
}

#[test]
fn test_non_finite_pan_from_model() {
    let mut registry = IdentityRegistry::new();
    let mut project = Project::new(Application::new("Test", "1.0"));
    let mut track = Track::with_channel(&mut registry, "Pad", vec![ContentType::Audio], MixerRole::Regular);
    if let Some(channel) = track.channel.as_mut() {
        channel.pan = Some(RealParameter::new(&mut registry, f64::INFINITY, Unit::Normalized));
    }
    project.structure.push(Lane::Track(track));

    let back = reload(&project);
    let pan = back.channels()[0].pan.as_ref().unwrap();
    assert!(pan.value.unwrap().is_infinite());
    assert!(pan.value.unwrap().is_sign_positive());
}

#[test]
fn test_fractional_values_survive() {
    let mut registry = IdentityRegistry::new();
    let mut project = Project::new(Application::new("Test", "1.0"));
    let mut channel = Channel::new(&mut registry, MixerRole::Master);
    channel.volume = Some(RealParameter::new(&mut registry, 0.1 + 0.2, Unit::Linear));
    project.structure.push(Lane::Channel(channel));

    let back = reload(&project);
    assert_eq!(back.channels()[0].volume.as_ref().unwrap().value, Some(0.1 + 0.2));
}

#[test]
fn test_zero_audio_channels_blocks_encoding() {
    let mut registry = IdentityRegistry::new();
    let mut project = Project::new(Application::new("Test", "1.0"));
    let mut channel = Channel::new(&mut registry, MixerRole::Master);
    channel.audio_channels = 0;
    project.structure.push(Lane::Channel(channel));

    let err = encode_project(&project).unwrap_err();
    assert_eq!(err.error_code(), "MALFORMED_VALUE");
    assert!(write_project(&project, &WriteOptions::default()).is_err());
}

// === Structure ===

#[test]
fn test_nested_tracks_with_send_to_parent() {
    let mut registry = IdentityRegistry::new();
    let mut group = Track::with_channel(&mut registry, "Group", vec![ContentType::Tracks], MixerRole::Submix);
    let group_channel = group.channel_id().cloned().unwrap();

    let mut inner = Track::new(&mut registry, "Inner");
    let mut leaf = Track::with_channel(&mut registry, "Leaf", vec![ContentType::Audio], MixerRole::Regular);
    if let Some(channel) = leaf.channel.as_mut() {
        channel.sends.push(Send::new(&mut registry, &group_channel, 0.7));
    }
    inner.tracks.push(leaf);
    group.tracks.push(inner);

    let mut project = Project::new(Application::new("Test", "1.0"));
    project.structure.push(Lane::Track(group));

    let back = reload(&project);
    assert_eq!(back, project);

    let tracks = back.tracks();
    assert_eq!(tracks.len(), 3);
    let leaf = tracks[2];
    let send = &leaf.channel.as_ref().unwrap().sends[0];
    let target = back.find_channel(send.destination.as_ref().unwrap()).unwrap();
    assert_eq!(target.role, MixerRole::Submix);
}

#[test]
fn test_forward_reference_resolves() {
    let decoded = read_project(SESSION, &DecodeOptions::default()).unwrap();
    let project = decoded.value;
    let lead = project.channels()[0];
    let send = &lead.sends[0];
    let destination = project
        .find_channel(send.destination.as_ref().unwrap())
        .unwrap();
    assert_eq!(destination.role, MixerRole::Master);
    assert_eq!(lead.destination, send.destination);
}

// === Metadata ===

#[test]
fn test_metadata_round_trip() {
    let metadata = example_metadata(&chrono::Utc::now());
    let text = write_metadata(&metadata, &WriteOptions::default()).unwrap();
    assert!(text.contains("<Title>Night Drive</Title>"));
    assert_eq!(read_metadata(&text).unwrap(), metadata);
}

#[test]
fn test_metadata_escaping() {
    let metadata = MetaData {
        artist: Some("Tom & Jerry <live>".to_string()),
        ..Default::default()
    };
    let text = write_metadata(&metadata, &WriteOptions::default()).unwrap();
    assert!(!text.contains("<live>"));
    assert_eq!(read_metadata(&text).unwrap(), metadata);
}

#[test]
fn test_metadata_keeps_padded_text() {
    let metadata = MetaData {
        title: Some(" Intro ".to_string()),
        comment: Some("line one\nline two".to_string()),
        ..Default::default()
    };
    for options in [WriteOptions::default(), WriteOptions::compact()] {
        let text = write_metadata(&metadata, &options).unwrap();
        assert_eq!(read_metadata(&text).unwrap(), metadata);
    }
}
