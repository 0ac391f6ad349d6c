//! Colored terminal logging.
//!
//! `log!("module"; ...)` prints a `[module]` prefix colored by module
//! name; `debug!` is the same but gated behind `--verbose`. Warnings
//! and errors go to stderr so a process supervisor capturing stderr
//! sees them even when stdout is discarded.

use owo_colors::OwoColorize;
use std::{
    io::{Write, stderr, stdout},
    sync::atomic::{AtomicBool, Ordering},
};

/// Global verbose flag (set by --verbose CLI argument)
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set verbose mode globally
pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

/// Check if verbose mode is enabled
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

// ============================================================================
// Log Macros
// ============================================================================

/// Log a message with a colored module prefix
///
/// # Usage
/// ```ignore
/// log!("scan"; "indexed {} slugs", count);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a debug message (only shown when --verbose is enabled)
///
/// # Usage
/// ```ignore
/// debug!("serve"; "GET {path} -> {rule}");
/// ```
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Log one line, picking the stream and prefix color by module name.
#[inline]
pub fn log(module: &str, message: &str) {
    let prefix = format!("[{module}]");
    let line = match module {
        "serve" => format!("{} {message}", prefix.bright_blue().bold()),
        "scan" => format!("{} {message}", prefix.bright_green().bold()),
        "resolve" => format!("{} {message}", prefix.bright_cyan().bold()),
        "warning" => format!("{} {message}", prefix.bright_yellow().bold()),
        "error" => format!("{} {message}", prefix.bright_red().bold()),
        _ => format!("{prefix} {message}"),
    };

    if matches!(module, "warning" | "error") {
        let mut stderr = stderr().lock();
        writeln!(stderr, "{line}").ok();
    } else {
        let mut stdout = stdout().lock();
        writeln!(stdout, "{line}").ok();
        stdout.flush().ok();
    }
}
