use std::future::Future;
use std::io::{BufRead, Write};
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::catalog::IndustryCatalog;
use crate::consumer::{StreamConsumer, validate};
use crate::display::prompt::prompt_field;
use crate::display::renderer::Renderer;
use crate::protocol::types::StrategyRequest;
use crate::session::form::FormSession;
use crate::transport::Transport;

pub struct GenerateConfig {
    /// Display name or identifier; the catalog's first entry when absent.
    pub industry: Option<String>,
    pub client: Option<String>,
    pub region: Option<String>,
}

/// How a generation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Failed,
    Interrupted,
    /// The stream closed without a terminal update.
    Ended,
}

/// Collect the form, submit it and render updates until the submission
/// ends or `interrupt` resolves.
pub async fn generate<R, W, I>(
    config: GenerateConfig,
    catalog: &IndustryCatalog,
    transport: Arc<dyn Transport>,
    input: &mut R,
    mut writer: W,
    interrupt: I,
) -> Result<Outcome>
where
    R: BufRead,
    W: Write,
    I: Future<Output = ()>,
{
    let industry = match config.industry {
        Some(query) => catalog.resolve(&query)?.to_string(),
        None => catalog
            .default_selection()
            .context("industry catalog is empty")?
            .to_string(),
    };
    let client = field(config.client, input, &mut writer, "Target enterprise client")?;
    let region = field(config.region, input, &mut writer, "Region of focus")?;
    let request = StrategyRequest::new(industry, client, region);

    let mut renderer = Renderer::with_writer(writer);
    if let Ok(valid) = validate(request.clone()) {
        renderer.render_header(&valid);
    }

    let mut form = FormSession::new(StreamConsumer::new(transport));
    let mut rx = form.subscribe();
    form.submit(request);

    tokio::pin!(interrupt);
    loop {
        let view = rx.borrow_and_update().clone();
        if let Some(result) = &view.result {
            renderer.render(result);
        }
        if !view.loading {
            return Ok(match view.result {
                Some(result) if !result.success => Outcome::Failed,
                Some(result) if result.is_terminal() => Outcome::Completed,
                _ => {
                    renderer.render_warning("stream closed before the strategy completed");
                    Outcome::Ended
                }
            });
        }
        tokio::select! {
            changed = rx.changed() => changed.context("form session closed")?,
            () = &mut interrupt => {
                form.cancel();
                renderer.render_interrupted();
                return Ok(Outcome::Interrupted);
            }
        }
    }
}

/// Use the value given on the command line, or prompt for it.
fn field<R: BufRead, W: Write>(
    given: Option<String>,
    input: &mut R,
    writer: &mut W,
    label: &str,
) -> Result<String> {
    if let Some(value) = given {
        return Ok(value);
    }
    let answer =
        prompt_field(input, writer, label).with_context(|| format!("failed to read {label}"))?;
    Ok(answer.unwrap_or_default())
}
