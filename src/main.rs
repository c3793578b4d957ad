//! dawproject CLI
//!
//! Command-line interface for the dawproject document engine.

use clap::Parser;
use env_logger::Env;
use log::info;

use dawproject::cli::commands;
use dawproject::cli::{Cli, Commands};
use dawproject::serialize::DecodeOptions;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    info!("dawproject v{}", env!("CARGO_PKG_VERSION"));

    let options = if cli.lenient {
        DecodeOptions::lenient()
    } else {
        DecodeOptions::strict()
    };

    match cli.command {
        Some(cmd) => handle_command(cmd, &options),
        None => {
            println!("dawproject v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for available commands");
            Ok(())
        }
    }
}

fn handle_command(cmd: Commands, options: &DecodeOptions) -> anyhow::Result<()> {
    match cmd {
        Commands::Inspect { path, json } => commands::inspect(&path, json, options),
        Commands::Roundtrip {
            input,
            output,
            indent,
        } => commands::roundtrip(&input, &output, indent, options),
        Commands::Check { dir } => commands::check(&dir, options),
        Commands::Metadata { path } => commands::show_metadata(&path, options),
        Commands::Example { dir } => commands::write_example(&dir),
    }
}
