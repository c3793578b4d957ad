//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use log::{info, warn};
use serde::Serialize;
use walkdir::WalkDir;

use crate::cli::example::{example_metadata, example_project};
use crate::codec;
use crate::model::{MetaData, Project, Timeline, METADATA_FILE, PROJECT_FILE};
use crate::registry::EntityKind;
use crate::serialize::{
    decode_project_with, document, encode_metadata, encode_project, read_project, write_metadata,
    write_project, xml, DecodeContext, DecodeOptions, Decoded, FromElement, WriteOptions,
};

/// Counts describing a decoded project
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectSummary {
    pub version: String,
    pub application: String,
    pub tempo: Option<f64>,
    pub time_signature: Option<String>,
    pub tracks: usize,
    pub channels: usize,
    pub devices: usize,
    pub clips: usize,
    pub timelines: usize,
    pub parameters: usize,
    pub scenes: usize,
    pub identities: usize,
    pub skipped: Vec<String>,
}

impl ProjectSummary {
    pub fn from_decoded(decoded: &Decoded<Project>) -> Self {
        let project = &decoded.value;
        let transport = project.transport.as_ref();
        Self {
            version: project.version.clone(),
            application: format!("{} {}", project.application.name, project.application.version),
            tempo: transport
                .and_then(|t| t.tempo.as_ref())
                .and_then(|tempo| tempo.value),
            time_signature: transport
                .and_then(|t| t.time_signature.as_ref())
                .map(|ts| format!("{}/{}", ts.numerator, ts.denominator)),
            tracks: project.tracks().len(),
            channels: project.channels().len(),
            devices: decoded.registry.count_of(EntityKind::Device),
            clips: count_project_clips(project),
            timelines: decoded.registry.count_of(EntityKind::Timeline),
            parameters: decoded.registry.count_of(EntityKind::Parameter),
            scenes: project.scenes.len(),
            identities: decoded.registry.len(),
            skipped: decoded.skipped.clone(),
        }
    }
}

fn count_project_clips(project: &Project) -> usize {
    let arrangement = project
        .arrangement
        .iter()
        .filter_map(|a| a.lanes.as_ref())
        .flat_map(|lanes| &lanes.lanes)
        .map(count_clips)
        .sum::<usize>();
    let scenes = project
        .scenes
        .iter()
        .filter_map(|scene| scene.content.as_ref())
        .map(count_clips)
        .sum::<usize>();
    arrangement + scenes
}

fn count_clips(timeline: &Timeline) -> usize {
    match timeline {
        Timeline::Clips(clips) => {
            clips.clips.len()
                + clips
                    .clips
                    .iter()
                    .filter_map(|clip| clip.content.as_deref())
                    .map(count_clips)
                    .sum::<usize>()
        }
        Timeline::ClipSlot(slot) => match &slot.clip {
            Some(clip) => 1 + clip.content.as_deref().map_or(0, count_clips),
            None => 0,
        },
        Timeline::Lanes(lanes) => lanes.lanes.iter().map(count_clips).sum(),
        Timeline::Warps(warps) => warps.content.as_deref().map_or(0, count_clips),
        Timeline::Notes(notes) => notes
            .notes
            .iter()
            .filter_map(|note| note.content.as_deref())
            .map(count_clips)
            .sum(),
        _ => 0,
    }
}

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn load_project(path: &Path, options: &DecodeOptions) -> Result<Decoded<Project>> {
    let text = read_text(path)?;
    let decoded = read_project(&text, options)
        .with_context(|| format!("Failed to decode {}", path.display()))?;
    if !decoded.skipped.is_empty() {
        warn!(
            "Skipped {} unknown elements in {}",
            decoded.skipped.len(),
            path.display()
        );
    }
    Ok(decoded)
}

fn load_metadata(path: &Path, options: &DecodeOptions) -> Result<MetaData> {
    let text = read_text(path)?;
    let root = xml::parse(&text).with_context(|| format!("Failed to parse {}", path.display()))?;
    let mut ctx = DecodeContext::new(options);
    let metadata = MetaData::from_element(&root, &mut ctx)
        .with_context(|| format!("Failed to decode {}", path.display()))?;
    Ok(metadata)
}

/// Decode a project and print its summary.
pub fn inspect(path: &Path, json: bool, options: &DecodeOptions) -> Result<()> {
    info!("Inspecting project: {}", path.display());

    let decoded = load_project(path, options)?;
    let summary = ProjectSummary::from_decoded(&decoded);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Project {} written by {}", summary.version, summary.application);
    if let Some(tempo) = summary.tempo {
        println!("Tempo: {} bpm", codec::format_real(tempo));
    }
    if let Some(ts) = &summary.time_signature {
        println!("Time signature: {}", ts);
    }
    println!("Tracks: {}", summary.tracks);
    for track in decoded.value.tracks() {
        println!(
            "  [{}] {}",
            track.identity.id,
            track.identity.name().unwrap_or("(unnamed)")
        );
    }
    println!("Channels: {}", summary.channels);
    println!("Devices: {}", summary.devices);
    println!("Clips: {}", summary.clips);
    println!("Timelines: {}", summary.timelines);
    println!("Parameters: {}", summary.parameters);
    println!("Scenes: {}", summary.scenes);
    println!("Identities: {}", summary.identities);
    if !summary.skipped.is_empty() {
        println!("Skipped: {}", summary.skipped.join(", "));
    }

    Ok(())
}

/// Decode a project and write it back out.
pub fn roundtrip(input: &Path, output: &Path, indent: usize, options: &DecodeOptions) -> Result<()> {
    info!("Round-tripping {} -> {}", input.display(), output.display());

    let decoded = load_project(input, options)?;
    let text = write_project(&decoded.value, &WriteOptions::default().with_indent(indent))?;
    fs::write(output, text).with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "Wrote {} ({} identities)",
        output.display(),
        decoded.registry.len()
    );
    Ok(())
}

/// Decode and re-encode one document, checking nothing is lost on the way.
fn check_document(text: &str, options: &DecodeOptions) -> Result<()> {
    let root = xml::parse(text)?;
    if document::document_kind(&root)? == "project" {
        let decoded = decode_project_with(&root, options)?;
        let again = decode_project_with(&encode_project(&decoded.value)?, options)?;
        if again.value != decoded.value {
            bail!("project changed after re-encoding");
        }
    } else {
        let metadata = MetaData::from_element(&root, &mut DecodeContext::new(options))?;
        let again = MetaData::from_element(&encode_metadata(&metadata)?, &mut DecodeContext::new(options))?;
        if again != metadata {
            bail!("metadata changed after re-encoding");
        }
    }
    Ok(())
}

/// Round-trip every project and metadata document under `dir`.
pub fn check(dir: &Path, options: &DecodeOptions) -> Result<()> {
    info!("Checking documents under: {}", dir.display());

    let mut checked = 0;
    let mut failed = 0;

    for entry in WalkDir::new(dir).into_iter().filter_map(|e| e.ok()) {
        let path = entry.path();
        let is_project = path.file_name().is_some_and(|n| n == PROJECT_FILE);
        let is_metadata = path.file_name().is_some_and(|n| n == METADATA_FILE);
        if !entry.file_type().is_file() || !(is_project || is_metadata) {
            continue;
        }

        checked += 1;
        let outcome = read_text(path).and_then(|text| check_document(&text, options));

        match outcome {
            Ok(()) => println!("ok      {}", path.display()),
            Err(e) => {
                failed += 1;
                println!("FAILED  {}: {:#}", path.display(), e);
            }
        }
    }

    println!("{} documents checked, {} failed", checked, failed);
    if failed > 0 {
        bail!("{} of {} documents failed the round trip", failed, checked);
    }
    Ok(())
}

/// Print every field of a metadata document.
pub fn show_metadata(path: &Path, options: &DecodeOptions) -> Result<()> {
    info!("Reading metadata: {}", path.display());

    let metadata = load_metadata(path, options)?;
    let mut empty = true;
    for (tag, value) in metadata.fields() {
        if let Some(value) = value {
            println!("{}: {}", tag, value);
            empty = false;
        }
    }
    if empty {
        println!("(no metadata)");
    }

    if let Some(stamp) = metadata
        .comment
        .as_deref()
        .and_then(|c| codec::decode_timestamp("Comment", c).ok())
    {
        println!("Written: {}", stamp.format("%Y-%m-%d %H:%M UTC"));
    }
    Ok(())
}

/// Write the example project and its metadata into `dir`.
pub fn write_example(dir: &Path) -> Result<()> {
    info!("Writing example project to: {}", dir.display());

    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    let options = WriteOptions::default();
    let project = example_project();
    let project_path = dir.join(PROJECT_FILE);
    fs::write(&project_path, write_project(&project, &options)?)
        .with_context(|| format!("Failed to write {}", project_path.display()))?;

    let metadata_path = dir.join(METADATA_FILE);
    fs::write(&metadata_path, write_metadata(&example_metadata(&Utc::now()), &options)?)
        .with_context(|| format!("Failed to write {}", metadata_path.display()))?;

    println!("Example written: {}", project_path.display());
    println!("Metadata written: {}", metadata_path.display());
    Ok(())
}
