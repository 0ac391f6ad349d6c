//! Resolve command implementation.
//!
//! Runs one path through the same cascade the server uses and prints
//! which rule decided and what the outcome is. Handy for checking what
//! an old inbound link will do without sending a request.

use anyhow::{Result, bail};

use crate::config::ServerConfig;
use crate::core::RequestPath;
use crate::index::SlugIndex;
use crate::resolve::{Resolution, Resolver, SiteLayout};

/// Execute resolve command
pub fn run_resolve(config: &ServerConfig, raw: &str) -> Result<()> {
    let layout = SiteLayout::new(config);
    if !layout.content_root().is_dir() {
        bail!(
            "content root {} not found (expected under {})",
            layout.content_root().display(),
            layout.workspace().display()
        );
    }

    let index = SlugIndex::scan(layout.content_root());
    let resolver = Resolver::new(layout, index);

    let path = RequestPath::parse(raw);
    let (rule, resolution) = resolver.resolve_traced(&path);

    println!("path:    {}", path.path());
    println!("rule:    {rule}");
    match resolution {
        Resolution::Serve(file) => {
            println!("outcome: serve {}", config.root_relative(&file).display());
        }
        Resolution::Redirect(location) => println!("outcome: 301 {location}"),
        Resolution::NotFound => println!("outcome: 404"),
        Resolution::Delegate => println!("outcome: static fallback"),
    }

    Ok(())
}
