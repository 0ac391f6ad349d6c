//! HTTP server for the exported site.
//!
//! A thin shell around [`crate::resolve`]: every request runs the rule
//! cascade, and the outcome maps onto a file response, a 301, a 404, or
//! plain static serving under the workspace root.

mod fallback;
mod response;

use crate::{
    config::ServerConfig,
    core::{RequestPath, register_server},
    debug,
    index::SlugIndex,
    log,
    resolve::{Resolution, Resolver, SiteLayout},
};
use anyhow::{Result, bail};
use std::net::SocketAddr;
use std::sync::Arc;
use tiny_http::{Request, Server};

/// Maximum number of port binding attempts.
const MAX_PORT_RETRIES: u16 = 10;

/// Scan the content tree, bind the listener, and serve until Ctrl+C.
pub fn run_server(config: &ServerConfig) -> Result<()> {
    let layout = SiteLayout::new(config);
    if !layout.content_root().is_dir() {
        bail!(
            "content root {} not found (expected under {})",
            layout.content_root().display(),
            layout.workspace().display()
        );
    }

    let index = SlugIndex::scan(layout.content_root());
    let resolver = Arc::new(Resolver::new(layout, index));

    let (server, addr) = bind_with_retry(config.serve.interface, config.serve.port)?;
    let server = Arc::new(server);
    register_server(Arc::clone(&server));

    log!("serve"; "http://{}", addr);

    run_request_loop(&server, &resolver);
    Ok(())
}

/// Bind to the specified interface and port, with automatic port retry.
fn bind_with_retry(interface: std::net::IpAddr, base_port: u16) -> Result<(Server, SocketAddr)> {
    for offset in 0..MAX_PORT_RETRIES {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                return Ok((server, addr));
            }
            Err(_) if offset + 1 < MAX_PORT_RETRIES => continue,
            Err(e) => {
                return Err(anyhow::anyhow!(
                    "Failed to bind after {} attempts (ports {}-{}): {}",
                    MAX_PORT_RETRIES,
                    base_port,
                    port,
                    e
                ));
            }
        }
    }
    unreachable!()
}

fn run_request_loop(server: &Server, resolver: &Arc<Resolver>) {
    // Use a thread pool to handle requests concurrently
    // This keeps a slow disk read from blocking other requests
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(4)
        .build()
        .expect("failed to create thread pool");

    for request in server.incoming_requests() {
        let resolver = Arc::clone(resolver);
        pool.spawn(move || {
            if let Err(e) = handle_request(request, &resolver) {
                // Skip logging for clients that disconnected mid-transfer
                let disconnect = e
                    .downcast_ref::<std::io::Error>()
                    .is_some_and(|io| io.kind() == std::io::ErrorKind::BrokenPipe);
                if !disconnect {
                    log!("serve"; "request error: {e}");
                }
            }
        });
    }
}

/// Handle a single HTTP request.
fn handle_request(request: Request, resolver: &Resolver) -> Result<()> {
    // Early exit if shutdown requested
    if crate::core::is_shutdown() {
        return response::respond_unavailable(request);
    }

    let path = RequestPath::parse(request.url());
    let (rule, resolution) = resolver.resolve_traced(&path);
    debug!("serve"; "{} {} -> {}", request.method(), path, rule);

    let layout = resolver.layout();
    match resolution {
        Resolution::Serve(file) => response::respond_file(request, &file, layout),
        Resolution::Redirect(location) => {
            response::respond_redirect(request, &location, path.query())
        }
        Resolution::NotFound => response::respond_not_found(request, layout),
        Resolution::Delegate => match fallback::resolve_static(path.path(), layout.workspace()) {
            Some(file) => response::respond_file(request, &file, layout),
            None => response::respond_not_found(request, layout),
        },
    }
}
