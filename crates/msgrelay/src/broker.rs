use std::path::Path;

use msgrelay_proxy::Proxy;
use msgrelay_transport::EndpointListener;
use tracing::info;

use crate::exit::{transport_error, CliResult};

/// Bind both listeners, accept one connection on each side, and relay
/// messages between them until a fatal error.
///
/// The two sides are symmetric: which one is called "frontend" only matters
/// for logging. Termination is external (a peer closing) or a fatal I/O
/// error; there is no built-in shutdown signal.
pub fn run(frontend_path: &Path, backend_path: &Path) -> CliResult<()> {
    let frontend_listener = EndpointListener::bind(frontend_path)
        .map_err(|err| transport_error("frontend bind failed", err))?;
    let backend_listener = EndpointListener::bind(backend_path)
        .map_err(|err| transport_error("backend bind failed", err))?;

    info!(path = ?frontend_path, "waiting for frontend peer");
    let frontend = frontend_listener
        .accept()
        .map_err(|err| transport_error("frontend accept failed", err))?;

    info!(path = ?backend_path, "waiting for backend peer");
    let backend = backend_listener
        .accept()
        .map_err(|err| transport_error("backend accept failed", err))?;

    info!("both peers connected; relaying");
    let mut proxy = Proxy::new(frontend, backend);
    proxy
        .run()
        .map_err(|err| transport_error("relay failed", err))
}
