//! Process-wide run state for serve mode.
//!
//! Holdover has no rebuild or reload phases, so the only shared state
//! is the shutdown flag and the listener handle the signal handler
//! needs to unblock.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use tiny_http::Server;

/// Set once Ctrl+C has been received.
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// The bound listener, registered so the handler can break its accept loop.
static SERVER: OnceLock<Arc<Server>> = OnceLock::new();

/// Install the Ctrl+C handler. Call once, before binding.
///
/// Until a server is registered there is nothing to drain, so an early
/// Ctrl+C (mid-scan, say) just exits. After registration the handler
/// flips the flag and unblocks the accept loop instead.
pub fn setup_shutdown_handler() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        SHUTDOWN.store(true, Ordering::SeqCst);

        match SERVER.get() {
            Some(server) => {
                crate::log!("serve"; "shutting down...");
                server.unblock();
            }
            None => std::process::exit(0),
        }
    })
    .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {}", e))
}

/// Hand the bound listener to the signal handler.
pub fn register_server(server: Arc<Server>) {
    let _ = SERVER.set(server);
}

/// Whether shutdown has been requested.
///
/// Relaxed is enough; the worst case is answering a few extra requests
/// while the flag propagates.
pub fn is_shutdown() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}
