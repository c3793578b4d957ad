//! dawproject - DAWproject document model and XML engine
//!
//! Builds, loads and saves projects in the DAWproject exchange format:
//! tracks, channels, devices, clips, automation and markers, with faithful
//! round-tripping of identity tokens and non-finite values.
//!
//! # Architecture
//!
//! - `codec`: primitive values to and from wire text
//! - `model`: the entity tree and the project/metadata envelope
//! - `registry`: identity tokens scoped to one build or load session
//! - `serialize`: element trees, tag resolvers, two-pass decoding and XML I/O
//!
//! ```no_run
//! use dawproject::serialize::{read_project, write_project, DecodeOptions, WriteOptions};
//!
//! # fn main() -> dawproject::Result<()> {
//! let text = std::fs::read_to_string("project.xml")?;
//! let loaded = read_project(&text, &DecodeOptions::default())?;
//! println!("{} tracks", loaded.value.tracks().len());
//! let saved = write_project(&loaded.value, &WriteOptions::default())?;
//! # let _ = saved;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod codec;
pub mod error;
pub mod model;
pub mod registry;
pub mod serialize;

pub use error::{DawError, Result};
pub use model::{MetaData, Project};
pub use registry::{EntityKind, IdentityRegistry};
pub use serialize::{
    decode_metadata, decode_project, decode_project_with, encode_metadata, encode_project,
    DecodeOptions, Decoded, Element, UnknownTagPolicy,
};
