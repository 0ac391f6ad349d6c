//! Command-line interface module.

mod args;
pub mod resolve;
pub mod scan;
pub mod serve;

pub use args::{Cli, Commands};
