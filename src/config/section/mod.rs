//! Configuration section definitions.
//!
//! Each module corresponds to a section in `holdover.toml`:
//!
//! | Module    | TOML Section | Purpose                              |
//! |-----------|--------------|--------------------------------------|
//! | `content` | `[content]`  | Content tree, languages, namespaces  |
//! | `serve`   | `[serve]`    | HTTP server binding                  |

mod content;
mod serve;

// Re-export section configs
pub use content::ContentConfig;
pub use serve::ServeConfig;
