//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Holdover legacy blog server CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: holdover.toml)
    #[arg(short = 'C', long, default_value = "holdover.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Serve the content tree with legacy URL redirects
    #[command(visible_alias = "s")]
    Serve {
        /// Port number to listen on; a non-numeric value falls back
        /// to the configured port
        port: Option<String>,

        /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
        #[arg(short, long)]
        interface: Option<std::net::IpAddr>,
    },

    /// Scan the content tree and print the slug index
    #[command(visible_alias = "sc")]
    Scan {
        /// Output the index as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Resolve one request path and show the decision
    #[command(visible_alias = "r")]
    Resolve {
        /// Request path, e.g. /blog/page/2
        path: String,
    },
}
