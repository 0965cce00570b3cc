//! Tessel CLI - render JSON scenes to PNG

mod cli;
mod commands;
mod scene;

use std::process::ExitCode;

use clap::Parser;
use cli::{Cli, Commands};
use log::{error, LevelFilter};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match &cli.command {
        Commands::Render(args) if args.verbose => LevelFilter::Debug,
        Commands::Render(args) if args.quiet => LevelFilter::Error,
        _ => LevelFilter::Info,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_env("RUST_LOG")
        .init();

    let result = match &cli.command {
        Commands::Info => commands::info::run(),
        Commands::Render(args) => commands::render::run(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        },
    }
}
