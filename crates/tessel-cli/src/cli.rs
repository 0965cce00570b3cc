//! CLI argument definitions using Clap v4

// this_file: crates/tessel-cli/src/cli.rs

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Tessel - antialiased shapes to PNG from the command line
#[derive(Parser, Debug)]
#[command(name = "tessel")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the version, backends and sampling constants
    #[command(alias = "i")]
    Info,

    /// Render a JSON scene to a PNG file
    #[command(alias = "r")]
    Render(RenderArgs),
}

/// Arguments for the render command
#[derive(Parser, Debug)]
pub struct RenderArgs {
    /// Scene file (JSON); `-` reads stdin
    pub scene: PathBuf,

    /// Output file (writes to stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Canvas width, overriding the scene
    #[arg(long)]
    pub width: Option<u32>,

    /// Canvas height, overriding the scene
    #[arg(long)]
    pub height: Option<u32>,

    /// Background color as #rgb, #rgba, #rrggbb or #rrggbbaa
    #[arg(short = 'b', long)]
    pub background: Option<String>,

    /// Value written to the PNG `Software` text chunk
    #[arg(long, default_value = "tessel")]
    pub software: String,

    /// Deflate level, 0 (fastest) to 9 (smallest)
    #[arg(short = 'c', long, default_value_t = 9)]
    pub compression: u32,

    /// Leave out the gAMA chunk
    #[arg(long)]
    pub no_gamma: bool,

    /// Log debug detail to stderr
    #[arg(short = 'v', long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors
    #[arg(short = 'q', long)]
    pub quiet: bool,
}
