//! Timeline encoding
//!
//! Content timelines (of a clip, a note, a warp map or a scene) are written as
//! a direct child element and recovered through the timeline resolver.

use crate::codec;
use crate::error::{DawError, Result};
use crate::model::{
    AutomationTarget, BoolPoint, Clip, ClipSlot, Clips, EnumPoint, FileReference, IntegerPoint,
    Lanes, Marker, Markers, MediaFile, Note, Notes, Point, Points, RealPoint, TimeSignaturePoint,
    Timeline, TimelineFields, Warp, Warps,
};
use crate::registry::EntityKind;
use crate::serialize::resolver::{POINT, TIMELINE};
use crate::serialize::{
    read_identity, read_nameable, read_reference, required_int, required_real, write_identity,
    write_nameable, DecodeContext, Element, FromElement, ToElement,
};

fn write_fields(el: &mut Element, fields: &TimelineFields) {
    write_identity(el, &fields.identity);
    if let Some(track) = &fields.track {
        el.set_attr("track", track.as_str());
    }
    el.set_opt_attr("timeUnit", codec::encode_enum(fields.time_unit));
}

fn read_fields(el: &Element, ctx: &mut DecodeContext) -> Result<TimelineFields> {
    Ok(TimelineFields {
        identity: read_identity(el, ctx, EntityKind::Timeline)?,
        track: read_reference(el, "track"),
        time_unit: codec::decode_enum("timeUnit", el.attr("timeUnit"))?,
    })
}

fn content(el: &Element, fixed: &[&str], ctx: &mut DecodeContext) -> Result<Option<Box<Timeline>>> {
    Ok(TIMELINE.decode_single(el, fixed, ctx)?.map(Box::new))
}

impl ToElement for Timeline {
    fn to_element(&self) -> Result<Element> {
        match self {
            Timeline::Clips(clips) => encode_clips(clips),
            Timeline::Notes(notes) => encode_notes(notes),
            Timeline::Markers(markers) => Ok(encode_markers(markers)),
            Timeline::Points(points) => Ok(encode_points(points, "Points")),
            Timeline::Lanes(lanes) => encode_lanes(lanes, "Lanes"),
            Timeline::Warps(warps) => encode_warps(warps),
            Timeline::Audio(media) => encode_media(media, "Audio"),
            Timeline::Video(media) => encode_media(media, "Video"),
            Timeline::ClipSlot(slot) => encode_clip_slot(slot),
        }
    }
}

impl FromElement for Timeline {
    fn from_element(element: &Element, ctx: &mut DecodeContext) -> Result<Self> {
        TIMELINE
            .decode(element, ctx)?
            .ok_or_else(|| DawError::UnknownVariant {
                role: "timeline".to_string(),
                tag: element.name.clone(),
            })
    }
}

// === Clips ===

fn encode_clips(clips: &Clips) -> Result<Element> {
    let mut el = Element::new("Clips");
    write_fields(&mut el, &clips.timeline);
    for clip in &clips.clips {
        el.push(encode_clip(clip)?);
    }
    Ok(el)
}

pub fn decode_clips(el: &Element, ctx: &mut DecodeContext) -> Result<Timeline> {
    let timeline = read_fields(el, ctx)?;
    let clips = el
        .children_named("Clip")
        .map(|child| decode_clip(child, ctx))
        .collect::<Result<Vec<_>>>()?;
    Ok(Timeline::Clips(Clips { timeline, clips }))
}

pub fn encode_clip(clip: &Clip) -> Result<Element> {
    let mut el = Element::new("Clip");
    write_nameable(&mut el, &clip.nameable);
    el.set_attr("time", codec::format_real(clip.time));
    el.set_opt_attr("duration", codec::encode_real(clip.duration));
    el.set_opt_attr("contentTimeUnit", codec::encode_enum(clip.content_time_unit));
    el.set_opt_attr("playStart", codec::encode_real(clip.play_start));
    el.set_opt_attr("playStop", codec::encode_real(clip.play_stop));
    el.set_opt_attr("loopStart", codec::encode_real(clip.loop_start));
    el.set_opt_attr("loopEnd", codec::encode_real(clip.loop_end));
    el.set_opt_attr("fadeTimeUnit", codec::encode_enum(clip.fade_time_unit));
    el.set_opt_attr("fadeInTime", codec::encode_real(clip.fade_in_time));
    el.set_opt_attr("fadeOutTime", codec::encode_real(clip.fade_out_time));
    el.set_opt_attr("enable", codec::encode_bool(clip.enable));
    if let Some(reference) = &clip.reference {
        el.set_attr("reference", reference.as_str());
    }
    if let Some(content) = &clip.content {
        el.push(content.to_element()?);
    }
    Ok(el)
}

pub fn decode_clip(el: &Element, ctx: &mut DecodeContext) -> Result<Clip> {
    Ok(Clip {
        nameable: read_nameable(el),
        time: required_real(el, "time")?,
        duration: codec::decode_real("duration", el.attr("duration"))?,
        content_time_unit: codec::decode_enum("contentTimeUnit", el.attr("contentTimeUnit"))?,
        play_start: codec::decode_real("playStart", el.attr("playStart"))?,
        play_stop: codec::decode_real("playStop", el.attr("playStop"))?,
        loop_start: codec::decode_real("loopStart", el.attr("loopStart"))?,
        loop_end: codec::decode_real("loopEnd", el.attr("loopEnd"))?,
        fade_time_unit: codec::decode_enum("fadeTimeUnit", el.attr("fadeTimeUnit"))?,
        fade_in_time: codec::decode_real("fadeInTime", el.attr("fadeInTime"))?,
        fade_out_time: codec::decode_real("fadeOutTime", el.attr("fadeOutTime"))?,
        enable: codec::decode_bool("enable", el.attr("enable"))?,
        content: content(el, &[], ctx)?,
        reference: read_reference(el, "reference"),
    })
}

// === Notes ===

fn encode_notes(notes: &Notes) -> Result<Element> {
    let mut el = Element::new("Notes");
    write_fields(&mut el, &notes.timeline);
    for note in &notes.notes {
        let mut child = Element::new("Note")
            .with_attr("time", codec::format_real(note.time))
            .with_attr("duration", codec::format_real(note.duration));
        child.set_opt_attr("channel", codec::encode_int(note.channel));
        child.set_attr("key", note.key.to_string());
        child.set_opt_attr("vel", codec::encode_real(note.velocity));
        child.set_opt_attr("rel", codec::encode_real(note.release_velocity));
        if let Some(content) = &note.content {
            child.push(content.to_element()?);
        }
        el.push(child);
    }
    Ok(el)
}

pub fn decode_notes(el: &Element, ctx: &mut DecodeContext) -> Result<Timeline> {
    let timeline = read_fields(el, ctx)?;
    let mut notes = Vec::new();
    for child in el.children_named("Note") {
        notes.push(Note {
            time: required_real(child, "time")?,
            duration: required_real(child, "duration")?,
            channel: codec::decode_int("channel", child.attr("channel"))?,
            key: required_int(child, "key")?,
            velocity: codec::decode_real("vel", child.attr("vel"))?,
            release_velocity: codec::decode_real("rel", child.attr("rel"))?,
            content: content(child, &[], ctx)?,
        });
    }
    Ok(Timeline::Notes(Notes { timeline, notes }))
}

// === Markers ===

pub fn encode_markers(markers: &Markers) -> Element {
    let mut el = Element::new("Markers");
    write_fields(&mut el, &markers.timeline);
    for marker in &markers.markers {
        let mut child = Element::new("Marker");
        write_nameable(&mut child, &marker.nameable);
        child.set_attr("time", codec::format_real(marker.time));
        el.push(child);
    }
    el
}

pub fn decode_markers_body(el: &Element, ctx: &mut DecodeContext) -> Result<Markers> {
    let timeline = read_fields(el, ctx)?;
    let markers = el
        .children_named("Marker")
        .map(|child| {
            Ok(Marker {
                nameable: read_nameable(child),
                time: required_real(child, "time")?,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Markers { timeline, markers })
}

pub fn decode_markers(el: &Element, ctx: &mut DecodeContext) -> Result<Timeline> {
    decode_markers_body(el, ctx).map(Timeline::Markers)
}

// === Points ===

fn encode_target(target: &AutomationTarget) -> Element {
    let mut el = Element::new("Target");
    if let Some(parameter) = &target.parameter {
        el.set_attr("parameter", parameter.as_str());
    }
    el.set_opt_attr("expression", codec::encode_enum(target.expression));
    el.set_opt_attr("channel", codec::encode_int(target.channel));
    el.set_opt_attr("key", codec::encode_int(target.key));
    el.set_opt_attr("controller", codec::encode_int(target.controller));
    el
}

fn decode_target(el: &Element) -> Result<AutomationTarget> {
    Ok(AutomationTarget {
        parameter: read_reference(el, "parameter"),
        expression: codec::decode_enum("expression", el.attr("expression"))?,
        channel: codec::decode_int("channel", el.attr("channel"))?,
        key: codec::decode_int("key", el.attr("key"))?,
        controller: codec::decode_int("controller", el.attr("controller"))?,
    })
}

/// Encode an automation lane under `tag` (`Points`, `TempoAutomation`, ...).
pub fn encode_points(points: &Points, tag: &str) -> Element {
    let mut el = Element::new(tag);
    write_fields(&mut el, &points.timeline);
    el.set_opt_attr("unit", codec::encode_enum(points.unit));
    el.push(encode_target(&points.target));
    for point in &points.points {
        el.push(encode_point(point));
    }
    el
}

pub fn decode_points_body(el: &Element, ctx: &mut DecodeContext) -> Result<Points> {
    let timeline = read_fields(el, ctx)?;
    let target = match el.child("Target") {
        Some(target) => decode_target(target)?,
        None => AutomationTarget::default(),
    };
    Ok(Points {
        timeline,
        target,
        points: POINT.decode_children(el, &["Target"], ctx)?,
        unit: codec::decode_enum("unit", el.attr("unit"))?,
    })
}

pub fn decode_points(el: &Element, ctx: &mut DecodeContext) -> Result<Timeline> {
    decode_points_body(el, ctx).map(Timeline::Points)
}

pub fn encode_point(point: &Point) -> Element {
    let mut el = Element::new(point.tag()).with_attr("time", codec::format_real(point.time()));
    match point {
        Point::Real(p) => {
            el.set_attr("value", codec::format_real(p.value));
            el.set_opt_attr("interpolation", codec::encode_enum(p.interpolation));
        }
        Point::Bool(p) => {
            el.set_opt_attr("value", codec::encode_bool(Some(p.value)));
        }
        Point::Integer(p) => el.set_attr("value", p.value.to_string()),
        Point::Enum(p) => el.set_attr("value", p.value.to_string()),
        Point::TimeSignature(p) => {
            el.set_attr("numerator", p.numerator.to_string());
            el.set_attr("denominator", p.denominator.to_string());
        }
    }
    el
}

pub fn decode_real_point(el: &Element, _ctx: &mut DecodeContext) -> Result<Point> {
    Ok(Point::Real(RealPoint {
        time: required_real(el, "time")?,
        value: required_real(el, "value")?,
        interpolation: codec::decode_enum("interpolation", el.attr("interpolation"))?,
    }))
}

pub fn decode_bool_point(el: &Element, _ctx: &mut DecodeContext) -> Result<Point> {
    let value = codec::decode_bool("value", el.attr("value"))?
        .ok_or_else(|| DawError::missing(&el.name, "value"))?;
    Ok(Point::Bool(BoolPoint {
        time: required_real(el, "time")?,
        value,
    }))
}

pub fn decode_integer_point(el: &Element, _ctx: &mut DecodeContext) -> Result<Point> {
    Ok(Point::Integer(IntegerPoint {
        time: required_real(el, "time")?,
        value: required_int(el, "value")?,
    }))
}

pub fn decode_enum_point(el: &Element, _ctx: &mut DecodeContext) -> Result<Point> {
    Ok(Point::Enum(EnumPoint {
        time: required_real(el, "time")?,
        value: required_int(el, "value")?,
    }))
}

pub fn decode_time_signature_point(el: &Element, _ctx: &mut DecodeContext) -> Result<Point> {
    Ok(Point::TimeSignature(TimeSignaturePoint {
        time: required_real(el, "time")?,
        numerator: required_int(el, "numerator")?,
        denominator: required_int(el, "denominator")?,
    }))
}

// === Lanes ===

pub fn encode_lanes(lanes: &Lanes, tag: &str) -> Result<Element> {
    let mut el = Element::new(tag);
    write_fields(&mut el, &lanes.timeline);
    for lane in &lanes.lanes {
        el.push(lane.to_element()?);
    }
    Ok(el)
}

pub fn decode_lanes_body(el: &Element, ctx: &mut DecodeContext) -> Result<Lanes> {
    let timeline = read_fields(el, ctx)?;
    Ok(Lanes {
        timeline,
        lanes: TIMELINE.decode_children(el, &[], ctx)?,
    })
}

pub fn decode_lanes(el: &Element, ctx: &mut DecodeContext) -> Result<Timeline> {
    decode_lanes_body(el, ctx).map(Timeline::Lanes)
}

// === Warps ===

fn encode_warps(warps: &Warps) -> Result<Element> {
    let mut el = Element::new("Warps");
    write_fields(&mut el, &warps.timeline);
    el.set_attr("contentTimeUnit", warps.content_time_unit.to_string());
    if let Some(content) = &warps.content {
        el.push(content.to_element()?);
    }
    for warp in &warps.warps {
        el.push(
            Element::new("Warp")
                .with_attr("time", codec::format_real(warp.time))
                .with_attr("contentTime", codec::format_real(warp.content_time)),
        );
    }
    Ok(el)
}

pub fn decode_warps(el: &Element, ctx: &mut DecodeContext) -> Result<Timeline> {
    let timeline = read_fields(el, ctx)?;
    let content_time_unit = codec::decode_enum("contentTimeUnit", el.attr("contentTimeUnit"))?
        .ok_or_else(|| DawError::missing(&el.name, "contentTimeUnit"))?;
    let warps = el
        .children_named("Warp")
        .map(|child| {
            Ok(Warp {
                time: required_real(child, "time")?,
                content_time: required_real(child, "contentTime")?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Timeline::Warps(Warps {
        timeline,
        content_time_unit,
        content: content(el, &["Warp"], ctx)?,
        warps,
    }))
}

// === Media ===

fn encode_media(media: &MediaFile, tag: &str) -> Result<Element> {
    if tag == "Audio" {
        if media.sample_rate.is_none() {
            return Err(DawError::missing(tag, "sampleRate"));
        }
        if media.channels.is_none() {
            return Err(DawError::missing(tag, "channels"));
        }
    }

    let mut el = Element::new(tag);
    write_fields(&mut el, &media.timeline);
    el.set_attr("duration", codec::format_real(media.duration));
    el.set_opt_attr("sampleRate", codec::encode_int(media.sample_rate));
    el.set_opt_attr("channels", codec::encode_int(media.channels));
    el.set_opt_attr("algorithm", media.algorithm.clone());
    el.push(encode_file_reference(&media.file, "File"));
    Ok(el)
}

fn decode_media(el: &Element, ctx: &mut DecodeContext) -> Result<MediaFile> {
    let timeline = read_fields(el, ctx)?;
    Ok(MediaFile {
        timeline,
        duration: required_real(el, "duration")?,
        sample_rate: codec::decode_int("sampleRate", el.attr("sampleRate"))?,
        channels: codec::decode_int("channels", el.attr("channels"))?,
        algorithm: el.attr("algorithm").map(str::to_string),
        file: decode_file_reference(el.required_child("File")?)?,
    })
}

pub fn decode_audio(el: &Element, ctx: &mut DecodeContext) -> Result<Timeline> {
    el.required_attr("sampleRate")?;
    el.required_attr("channels")?;
    decode_media(el, ctx).map(Timeline::Audio)
}

pub fn decode_video(el: &Element, ctx: &mut DecodeContext) -> Result<Timeline> {
    decode_media(el, ctx).map(Timeline::Video)
}

pub fn encode_file_reference(file: &FileReference, tag: &str) -> Element {
    let mut el = Element::new(tag).with_attr("path", file.path.as_str());
    el.set_opt_attr("external", codec::encode_bool(file.external));
    el
}

pub fn decode_file_reference(el: &Element) -> Result<FileReference> {
    Ok(FileReference {
        path: el.required_attr("path")?.to_string(),
        external: codec::decode_bool("external", el.attr("external"))?,
    })
}

// === Clip Slots ===

fn encode_clip_slot(slot: &ClipSlot) -> Result<Element> {
    let mut el = Element::new("ClipSlot");
    write_fields(&mut el, &slot.timeline);
    el.set_opt_attr("hasStop", codec::encode_bool(slot.has_stop));
    if let Some(clip) = &slot.clip {
        el.push(encode_clip(clip)?);
    }
    Ok(el)
}

pub fn decode_clip_slot(el: &Element, ctx: &mut DecodeContext) -> Result<Timeline> {
    let timeline = read_fields(el, ctx)?;
    let clip = el
        .child("Clip")
        .map(|child| decode_clip(child, ctx))
        .transpose()?;
    Ok(Timeline::ClipSlot(ClipSlot {
        timeline,
        clip,
        has_stop: codec::decode_bool("hasStop", el.attr("hasStop"))?,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ExpressionType, Interpolation, TimeUnit, Unit};
    use crate::registry::IdentityRegistry;
    use crate::serialize::DecodeOptions;
    use pretty_assertions::assert_eq;

    fn round_trip(timeline: &Timeline) -> Timeline {
        let el = timeline.to_element().unwrap();
        Timeline::from_element(&el, &mut DecodeContext::default()).unwrap()
    }

    #[test]
    fn test_notes_in_clip_round_trip() {
        let mut registry = IdentityRegistry::new();
        let mut notes = Notes::new(&mut registry);
        notes.notes.push(Note::new(0.0, 0.5, 60, 0.8));
        notes.notes.push(Note {
            release_velocity: Some(0.25),
            ..Note::new(1.0, 0.5, 64, 0.7)
        });
        let mut clip = Clip::new(Timeline::Notes(notes), 4.0, 8.0);
        clip.loop_end = Some(f64::INFINITY);
        clip.fade_time_unit = Some(TimeUnit::Beats);
        let clips = Timeline::Clips(Clips::with_clips(&mut registry, vec![clip]));

        assert_eq!(round_trip(&clips), clips);
    }

    #[test]
    fn test_points_round_trip() {
        let mut registry = IdentityRegistry::new();
        let mut points = Points::new(
            &mut registry,
            AutomationTarget {
                channel: Some(1),
                ..AutomationTarget::expression(ExpressionType::PitchBend)
            },
        );
        points.unit = Some(Unit::Semitones);
        points.points = vec![
            Point::real(0.0, 0.0, Interpolation::Linear),
            Point::Bool(BoolPoint { time: 1.0, value: true }),
            Point::Integer(IntegerPoint { time: 2.0, value: -3 }),
            Point::Enum(EnumPoint { time: 3.0, value: 2 }),
            Point::TimeSignature(TimeSignaturePoint {
                time: 4.0,
                numerator: 6,
                denominator: 8,
            }),
        ];
        let timeline = Timeline::Points(points);
        assert_eq!(round_trip(&timeline), timeline);
    }

    #[test]
    fn test_warps_with_audio_content() {
        let mut registry = IdentityRegistry::new();
        let audio = MediaFile::audio(
            &mut registry,
            FileReference::embedded("audio/loop.wav"),
            44100,
            2,
            3.5,
        );
        let mut warps = Warps::new(&mut registry, Timeline::Audio(audio), TimeUnit::Seconds);
        warps.warps = vec![Warp::new(0.0, 0.0), Warp::new(8.0, 3.5)];
        let timeline = Timeline::Warps(warps);

        let el = timeline.to_element().unwrap();
        assert_eq!(el.children[0].name, "Audio");
        assert_eq!(el.children_named("Warp").count(), 2);
        assert_eq!(round_trip(&timeline), timeline);
    }

    #[test]
    fn test_audio_requires_sample_rate() {
        let mut registry = IdentityRegistry::new();
        let mut audio = MediaFile::audio(
            &mut registry,
            FileReference::external("/samples/kick.wav"),
            48000,
            1,
            0.4,
        );
        audio.sample_rate = None;
        let err = Timeline::Audio(audio.clone()).to_element().unwrap_err();
        assert_eq!(err.error_code(), "MISSING_REQUIRED_FIELD");

        // Video has no such requirement
        assert!(Timeline::Video(audio).to_element().is_ok());
    }

    #[test]
    fn test_markers_and_clip_slot_round_trip() {
        let mut registry = IdentityRegistry::new();
        let mut markers = Markers::new(&mut registry);
        markers.markers.push(Marker::new(0.0, "Intro"));
        markers.markers.push(Marker::new(32.0, "Chorus"));
        let markers = Timeline::Markers(markers);
        assert_eq!(round_trip(&markers), markers);

        let inner = Notes::new(&mut registry);
        let mut slot = ClipSlot::new(&mut registry, Some(Clip::new(Timeline::Notes(inner), 0.0, 4.0)));
        slot.has_stop = Some(true);
        let slot = Timeline::ClipSlot(slot);
        assert_eq!(round_trip(&slot), slot);
    }

    #[test]
    fn test_unknown_lane_strict_and_lenient() {
        let el = Element::new("Lanes")
            .with_attr("id", "id0")
            .with_child(Element::new("Markers").with_attr("id", "id1"))
            .with_child(Element::new("Hologram").with_attr("id", "id2"));

        let err = Timeline::from_element(&el, &mut DecodeContext::default()).unwrap_err();
        assert!(matches!(
            err,
            DawError::UnknownVariant { ref role, ref tag } if role == "timeline" && tag == "Hologram"
        ));

        let mut ctx = DecodeContext::new(&DecodeOptions::lenient());
        let lanes = Timeline::from_element(&el, &mut ctx).unwrap();
        let Timeline::Lanes(lanes) = lanes else {
            panic!("expected lanes");
        };
        assert_eq!(lanes.lanes.len(), 1);
        assert_eq!(ctx.skipped().len(), 1);
    }

    #[test]
    fn test_clip_requires_time() {
        let el = Element::new("Clips")
            .with_attr("id", "id0")
            .with_child(Element::new("Clip").with_attr("duration", "4"));
        let err = Timeline::from_element(&el, &mut DecodeContext::default()).unwrap_err();
        assert!(matches!(err, DawError::MissingRequiredField { ref field, .. } if field == "time"));
    }

    #[test]
    fn test_alias_clip_keeps_reference() {
        let mut registry = IdentityRegistry::new();
        let target = registry.assign(EntityKind::Timeline);
        let clips = Timeline::Clips(Clips::with_clips(
            &mut registry,
            vec![Clip::alias(&target, 16.0, 4.0)],
        ));
        let el = clips.to_element().unwrap();
        assert_eq!(el.children[0].attr("reference"), Some(target.as_str()));
        assert!(el.children[0].children.is_empty());
        assert_eq!(round_trip(&clips), clips);
    }
}
