//! CLI Module
//!
//! Command-line interface for inspecting and converting DAWproject documents.

pub mod commands;
pub mod example;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// DAWproject tool - inspect, validate and round-trip project documents
#[derive(Parser, Debug)]
#[command(name = "dawproject")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Skip unknown elements instead of failing
    #[arg(long, global = true)]
    pub lenient: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Decode a project document and print a summary
    #[command(name = "inspect")]
    Inspect {
        /// Path to project.xml
        path: PathBuf,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Decode a project document and write it back out
    #[command(name = "roundtrip")]
    Roundtrip {
        /// Input project.xml
        input: PathBuf,

        /// Output path
        output: PathBuf,

        /// Spaces per indent level (0 for a single line)
        #[arg(long, default_value_t = 2)]
        indent: usize,
    },

    /// Check every project and metadata document under a directory
    #[command(name = "check")]
    Check {
        /// Directory to scan
        dir: PathBuf,
    },

    /// Decode and print a metadata document
    #[command(name = "metadata")]
    Metadata {
        /// Path to metadata.xml
        path: PathBuf,
    },

    /// Write an example project and metadata document
    #[command(name = "example")]
    Example {
        /// Output directory
        dir: PathBuf,
    },
}
