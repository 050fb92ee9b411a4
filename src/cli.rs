use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Form fields for a strategy request.
#[derive(clap::Args, Debug, Default)]
pub struct GenerateOpts {
    /// Industry display name or agent identifier (default: first in the catalog).
    #[arg(long)]
    pub industry: Option<String>,

    /// Target enterprise client. Prompted for when omitted.
    #[arg(long)]
    pub client: Option<String>,

    /// Region of focus. Prompted for when omitted.
    #[arg(long)]
    pub region: Option<String>,
}

#[derive(Parser, Debug)]
#[command(
    name = "strategist",
    about = "Stream an AI-generated enterprise sales strategy from the strategist backend",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub generate: GenerateOpts,

    /// Backend base URL. Overrides the config file and STRATEGIST_SERVER.
    #[arg(long, global = true)]
    pub server: Option<String>,

    /// Path to a config file (default: .strategist/config.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a strategy (the default when no subcommand is given).
    Generate {
        #[command(flatten)]
        opts: GenerateOpts,
    },

    /// List the industries the backend offers, in server order.
    Industries,
}
