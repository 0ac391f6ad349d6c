//! Server configuration management for `holdover.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── content    # [content]
//! │   └── serve      # [serve]
//! ├── error          # ConfigError
//! └── mod.rs         # ServerConfig (this file)
//! ```
//!
//! The config file is optional. A bare content export with no
//! `holdover.toml` next to it is served with the defaults, rooted at
//! the current working directory.

pub mod section;

mod error;

pub use error::ConfigError;
pub use section::{ContentConfig, ServeConfig};

use crate::{
    cli::{Cli, Commands},
    log,
};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing holdover.toml
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Workspace root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// HTTP server settings
    #[serde(default)]
    pub serve: ServeConfig,

    /// Content tree settings
    #[serde(default)]
    pub content: ContentConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            config_path: PathBuf::new(),
            root: PathBuf::new(),
            serve: ServeConfig::default(),
            content: ContentConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd to find the config file. The workspace
    /// root is the config file's parent directory, or cwd when no config
    /// file exists.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let mut config = match find_config_file(&cli.config) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.root = path.parent().map(Path::to_path_buf).unwrap_or(cwd);
                config.config_path = path;
                config
            }
            None => {
                let mut config = Self::default();
                config.root = cwd;
                config
            }
        };

        config.apply_command_options(cli);
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        // Show only the filename since the config always sits at the root
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Get the workspace root directory path
    pub fn get_root(&self) -> &Path {
        &self.root
    }

    /// Join a path with the workspace root directory.
    ///
    /// Shorthand for `config.get_root().join(path)`.
    pub fn root_join(&self, path: impl AsRef<Path>) -> PathBuf {
        self.root.join(path)
    }

    /// Get path relative to the workspace root
    pub fn root_relative(&self, path: impl AsRef<Path>) -> PathBuf {
        path.as_ref()
            .strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.as_ref().to_path_buf())
    }

    /// Absolute path of the content root directory.
    pub fn content_root(&self) -> PathBuf {
        self.root_join(&self.content.root)
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply command-specific configuration options.
    fn apply_command_options(&mut self, cli: &Cli) {
        match &cli.command {
            Commands::Serve { port, interface } => {
                // A non-numeric port argument falls back to the configured
                // port instead of failing.
                if let Some(port) = port.as_deref().and_then(|p| p.parse().ok()) {
                    self.serve.port = port;
                }
                Self::update_option(&mut self.serve.interface, interface.as_ref());
            }
            Commands::Scan { .. } | Commands::Resolve { .. } => {}
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate configuration.
    pub fn validate(&self) -> Result<()> {
        self.content.validate()?;
        Ok(())
    }
}

/// Find config file by searching upward from current directory
///
/// Starts from cwd and walks up parent directories until finding `config_name`
/// Returns the absolute path to the config file if found
///
/// # Example
/// ```text
/// /home/user/site/blog/us/tips/   ← cwd
/// /home/user/site/holdover.toml   ← found!
/// ```
fn find_config_file(config_name: &Path) -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;

    // First check if config_name is an absolute path or exists in cwd
    if config_name.is_absolute() && config_name.exists() {
        return Some(config_name.to_path_buf());
    }

    // Walk up from cwd looking for config file
    let mut current = cwd.as_path();
    loop {
        let candidate = current.join(config_name);
        if candidate.exists() {
            return Some(candidate);
        }

        // Move to parent directory
        match current.parent() {
            Some(parent) => current = parent,
            None => return None, // Reached filesystem root
        }
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config from a TOML snippet.
/// Panics if there are unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> ServerConfig {
    let (parsed, ignored) = ServerConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};

    fn serve_cli(port: Option<&str>, interface: Option<IpAddr>) -> Cli {
        Cli {
            color: clap::ColorChoice::Auto,
            config: PathBuf::from("holdover.toml"),
            verbose: false,
            command: Commands::Serve {
                port: port.map(str::to_string),
                interface,
            },
        }
    }

    #[test]
    fn test_invalid_toml() {
        // Invalid TOML syntax - unclosed bracket
        let result: Result<ServerConfig, _> = toml::from_str("[serve\nport = 8001");
        assert!(result.is_err());
    }

    #[test]
    fn test_server_config_default() {
        let config = ServerConfig::default();

        assert_eq!(config.config_path, PathBuf::new());
        assert_eq!(config.get_root(), Path::new(""));
        assert_eq!(config.serve.port, 8001);
        assert_eq!(config.content.root, "blog");
    }

    #[test]
    fn test_content_root_join() {
        let mut config = ServerConfig::default();
        config.root = PathBuf::from("/srv/site");

        assert_eq!(config.content_root(), PathBuf::from("/srv/site/blog"));
        assert_eq!(
            config.root_join("favicon.ico"),
            PathBuf::from("/srv/site/favicon.ico")
        );
        assert_eq!(
            config.root_relative("/srv/site/blog/faq"),
            PathBuf::from("blog/faq")
        );
    }

    #[test]
    fn test_unknown_fields_detected() {
        let content = "[serve]\nport = 8080\n[unknown_section]\nfield = \"value\"";
        let (config, ignored) = ServerConfig::parse_with_ignored(content).unwrap();

        // Config should parse successfully
        assert_eq!(config.serve.port, 8080);

        // Unknown fields should be collected
        assert!(!ignored.is_empty());
        assert!(ignored.iter().any(|f| f.contains("unknown_section")));
    }

    #[test]
    fn test_no_unknown_fields() {
        let content = "[serve]\nport = 8080\n[content]\nroot = \"blog\"";
        let (_, ignored) = ServerConfig::parse_with_ignored(content).unwrap();
        assert!(ignored.is_empty());
    }

    #[test]
    fn test_serve_port_override() {
        let mut config = ServerConfig::default();
        config.apply_command_options(&serve_cli(Some("9000"), None));
        assert_eq!(config.serve.port, 9000);
    }

    #[test]
    fn test_serve_port_override_non_numeric() {
        let mut config = ServerConfig::default();
        config.apply_command_options(&serve_cli(Some("eight"), None));
        // Falls back to the configured port
        assert_eq!(config.serve.port, 8001);
    }

    #[test]
    fn test_serve_interface_override() {
        let mut config = ServerConfig::default();
        let lan = IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0));
        config.apply_command_options(&serve_cli(None, Some(lan)));
        assert_eq!(config.serve.interface, lan);
    }

    #[test]
    fn test_validate_rejects_bad_language() {
        let mut config = ServerConfig::default();
        config.content.default_language = "de".to_string();
        assert!(config.validate().is_err());
    }
}
