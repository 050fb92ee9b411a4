use std::future::Future;
use std::io::{self, Write};

use crate::catalog::IndustryCatalog;
use crate::display::renderer::Renderer;
use crate::transport::HttpTransport;

pub mod generate;
pub mod industries;

/// Fetch the industry catalog, falling back to the built-in list when the
/// backend cannot provide one.
pub async fn load_catalog<W: Write>(
    transport: &HttpTransport,
    renderer: &mut Renderer<W>,
) -> IndustryCatalog {
    match transport.fetch_industries().await {
        Ok(catalog) if !catalog.is_empty() => catalog,
        Ok(_) => {
            renderer.render_warning("backend returned no industries; using built-in list");
            IndustryCatalog::builtin()
        }
        Err(e) => {
            tracing::warn!("industry catalog unavailable: {e}");
            renderer.render_warning(&format!("{e}; using built-in list"));
            IndustryCatalog::builtin()
        }
    }
}

/// Resolve when `signal` fires. If the handler could not be installed,
/// never resolve, so a missing handler is not mistaken for an interrupt.
pub async fn interrupted<F>(signal: F)
where
    F: Future<Output = io::Result<()>>,
{
    if let Err(e) = signal.await {
        tracing::warn!("cannot listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
}
