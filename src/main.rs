mod cli;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use strategist::commands::{self, generate::GenerateConfig, generate::Outcome};
use strategist::config::{self, SERVER_ENV};
use strategist::display::renderer::Renderer;
use strategist::logging;
use strategist::transport::HttpTransport;

use cli::{Cli, Command, GenerateOpts};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    logging::init();
    let cli = Cli::parse();

    let cwd = std::env::current_dir().context("failed to read current directory")?;
    let config = config::load(cli.config.as_deref(), &cwd)?
        .with_server(std::env::var(SERVER_ENV).ok(), cli.server);
    tracing::debug!(base_url = %config.base_url, "loaded configuration");
    let transport = HttpTransport::new(&config)?;

    let mut renderer = Renderer::new();
    let catalog = commands::load_catalog(&transport, &mut renderer).await;

    match cli.command {
        Some(Command::Industries) => {
            commands::industries::industries(&catalog, std::io::stdout());
            Ok(ExitCode::SUCCESS)
        }
        Some(Command::Generate { opts }) => run_generate(opts, &catalog, transport).await,
        None => run_generate(cli.generate, &catalog, transport).await,
    }
}

async fn run_generate(
    opts: GenerateOpts,
    catalog: &strategist::catalog::IndustryCatalog,
    transport: HttpTransport,
) -> Result<ExitCode> {
    let outcome = commands::generate::generate(
        GenerateConfig {
            industry: opts.industry,
            client: opts.client,
            region: opts.region,
        },
        catalog,
        Arc::new(transport),
        &mut std::io::stdin().lock(),
        std::io::stdout(),
        commands::interrupted(tokio::signal::ctrl_c()),
    )
    .await?;
    Ok(match outcome {
        Outcome::Completed => ExitCode::SUCCESS,
        Outcome::Interrupted => ExitCode::from(130),
        Outcome::Failed | Outcome::Ended => ExitCode::FAILURE,
    })
}
