//! Document envelope: the project root and the metadata document
//!
//! `Project` and `MetaData` are independent roots. They are stored side by
//! side in a container but never reference each other.

use serde::Serialize;

use crate::model::visit::{self, EntityRef};
use crate::model::{
    Channel, Id, IdentityFields, Lane, Lanes, Markers, Points, RealParameter,
    TimeSignatureParameter, Timeline, Track, Unit,
};
use crate::registry::{EntityKind, IdentityRegistry};

/// Name of the project document inside a container
pub const PROJECT_FILE: &str = "project.xml";

/// Name of the metadata document inside a container
pub const METADATA_FILE: &str = "metadata.xml";

/// Container file extension
pub const FILE_EXTENSION: &str = "dawproject";

pub const FORMAT_NAME: &str = "DAWproject exchange format";

/// Application that wrote the document
#[derive(Debug, Clone, PartialEq)]
pub struct Application {
    pub name: String,
    pub version: String,
}

impl Application {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

/// Global tempo and meter
#[derive(Debug, Clone, PartialEq)]
pub struct Transport {
    pub tempo: Option<RealParameter>,
    pub time_signature: Option<TimeSignatureParameter>,
}

impl Transport {
    pub fn new(registry: &mut IdentityRegistry, bpm: f64, numerator: u32, denominator: u32) -> Self {
        Self {
            tempo: Some(RealParameter::new(registry, bpm, Unit::Bpm).with_range(20.0, 999.0)),
            time_signature: Some(TimeSignatureParameter::new(numerator, denominator)),
        }
    }
}

/// Main timeline of the project
#[derive(Debug, Clone, PartialEq)]
pub struct Arrangement {
    pub identity: IdentityFields,
    pub time_signature_automation: Option<Points>,
    pub tempo_automation: Option<Points>,
    pub markers: Option<Markers>,
    pub lanes: Option<Lanes>,
}

impl Arrangement {
    pub fn new(registry: &mut IdentityRegistry) -> Self {
        Self {
            identity: IdentityFields::assign(registry, EntityKind::Arrangement),
            time_signature_automation: None,
            tempo_automation: None,
            markers: None,
            lanes: None,
        }
    }
}

/// Clip launcher scene
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub identity: IdentityFields,
    pub content: Option<Timeline>,
}

impl Scene {
    pub fn new(registry: &mut IdentityRegistry, name: impl Into<String>) -> Self {
        Self {
            identity: IdentityFields::assign(registry, EntityKind::Scene).with_name(name),
            content: None,
        }
    }
}

/// Root of the project document
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub version: String,
    pub application: Application,
    pub transport: Option<Transport>,
    pub structure: Vec<Lane>,
    pub arrangement: Option<Arrangement>,
    pub scenes: Vec<Scene>,
}

impl Project {
    pub const CURRENT_VERSION: &'static str = "1.0";

    pub fn new(application: Application) -> Self {
        Self {
            version: Self::CURRENT_VERSION.to_string(),
            application,
            transport: None,
            structure: Vec::new(),
            arrangement: None,
            scenes: Vec::new(),
        }
    }

    /// Every track in the structure, depth first
    pub fn tracks(&self) -> Vec<&Track> {
        fn collect<'a>(track: &'a Track, out: &mut Vec<&'a Track>) {
            out.push(track);
            for child in &track.tracks {
                collect(child, out);
            }
        }

        let mut out = Vec::new();
        for lane in &self.structure {
            if let Lane::Track(track) = lane {
                collect(track, &mut out);
            }
        }
        out
    }

    /// Every channel, whether owned by a track or standing alone
    pub fn channels(&self) -> Vec<&Channel> {
        let mut out: Vec<&Channel> = self
            .structure
            .iter()
            .filter_map(|lane| match lane {
                Lane::Channel(channel) => Some(channel),
                Lane::Track(_) => None,
            })
            .collect();
        out.extend(self.tracks().into_iter().filter_map(|t| t.channel.as_ref()));
        out
    }

    pub fn find_track(&self, id: &Id) -> Option<&Track> {
        self.tracks().into_iter().find(|t| &t.identity.id == id)
    }

    pub fn find_channel(&self, id: &Id) -> Option<&Channel> {
        self.channels().into_iter().find(|c| &c.identity.id == id)
    }

    /// The entity owning `id`, of any kind
    pub fn resolve(&self, id: &Id) -> Option<EntityRef<'_>> {
        visit::find_entity(self, id)
    }

    /// The channel with the master role, if any
    pub fn master_channel(&self) -> Option<&Channel> {
        self.channels()
            .into_iter()
            .find(|c| c.role == crate::model::MixerRole::Master)
    }
}

/// Descriptive metadata document
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaData {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub original_artist: Option<String>,
    pub composer: Option<String>,
    pub songwriter: Option<String>,
    pub producer: Option<String>,
    pub arranger: Option<String>,
    pub year: Option<String>,
    pub genre: Option<String>,
    pub copyright: Option<String>,
    pub website: Option<String>,
    pub comment: Option<String>,
}

impl MetaData {
    /// Element tags paired with their field, in document order
    pub fn fields(&self) -> [(&'static str, Option<&str>); 13] {
        [
            ("Title", self.title.as_deref()),
            ("Artist", self.artist.as_deref()),
            ("Album", self.album.as_deref()),
            ("OriginalArtist", self.original_artist.as_deref()),
            ("Composer", self.composer.as_deref()),
            ("Songwriter", self.songwriter.as_deref()),
            ("Producer", self.producer.as_deref()),
            ("Arranger", self.arranger.as_deref()),
            ("Year", self.year.as_deref()),
            ("Genre", self.genre.as_deref()),
            ("Copyright", self.copyright.as_deref()),
            ("Website", self.website.as_deref()),
            ("Comment", self.comment.as_deref()),
        ]
    }

    /// Mutable slot for an element tag
    pub fn field_mut(&mut self, tag: &str) -> Option<&mut Option<String>> {
        let slot = match tag {
            "Title" => &mut self.title,
            "Artist" => &mut self.artist,
            "Album" => &mut self.album,
            "OriginalArtist" => &mut self.original_artist,
            "Composer" => &mut self.composer,
            "Songwriter" => &mut self.songwriter,
            "Producer" => &mut self.producer,
            "Arranger" => &mut self.arranger,
            "Year" => &mut self.year,
            "Genre" => &mut self.genre,
            "Copyright" => &mut self.copyright,
            "Website" => &mut self.website,
            "Comment" => &mut self.comment,
            _ => return None,
        };
        Some(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ContentType, MixerRole};

    fn nested_project(registry: &mut IdentityRegistry) -> Project {
        let mut project = Project::new(Application::new("Test", "1.0"));
        let mut folder = Track::new(registry, "Folder");
        let inner = Track::with_channel(registry, "Inner", vec![ContentType::Notes], MixerRole::Regular);
        folder.tracks.push(inner);
        let master = Track::with_channel(registry, "Master", vec![], MixerRole::Master);
        project.structure.push(Lane::Track(folder));
        project.structure.push(Lane::Track(master));
        project
    }

    #[test]
    fn test_tracks_are_depth_first() {
        let mut registry = IdentityRegistry::new();
        let project = nested_project(&mut registry);
        let names: Vec<_> = project
            .tracks()
            .iter()
            .map(|t| t.identity.name().unwrap_or_default())
            .collect();
        assert_eq!(names, vec!["Folder", "Inner", "Master"]);
    }

    #[test]
    fn test_find_channel() {
        let mut registry = IdentityRegistry::new();
        let project = nested_project(&mut registry);
        let master = project.master_channel().unwrap();
        let found = project.find_channel(&master.identity.id).unwrap();
        assert_eq!(found.role, MixerRole::Master);
        assert!(project.find_channel(&Id::from("missing")).is_none());
    }

    #[test]
    fn test_metadata_slots() {
        let mut meta = MetaData::default();
        *meta.field_mut("Genre").unwrap() = Some("Ambient".to_string());
        assert_eq!(meta.genre.as_deref(), Some("Ambient"));
        assert!(meta.field_mut("Mood").is_none());
        assert_eq!(meta.fields()[9], ("Genre", Some("Ambient")));
    }
}
