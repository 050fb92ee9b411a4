use std::io::Write;

use crate::catalog::IndustryCatalog;
use crate::display::renderer::Renderer;

/// List the catalog in server order, marking the default entry.
pub fn industries<W: Write>(catalog: &IndustryCatalog, writer: W) {
    let mut renderer = Renderer::with_writer(writer);
    renderer.render_industries(catalog);
}
