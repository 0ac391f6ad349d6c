//! Holdover - a redirecting file server for an exported WordPress blog.

mod cli;
mod config;
mod core;
mod index;
mod logger;
mod resolve;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::ServerConfig;

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    logger::set_verbose(cli.verbose);

    let config = ServerConfig::load(&cli)?;

    match &cli.command {
        Commands::Serve { .. } => cli::serve::run_server(&config),
        Commands::Scan { json } => cli::scan::run_scan(&config, *json),
        Commands::Resolve { path } => cli::resolve::run_resolve(&config, path),
    }
}
