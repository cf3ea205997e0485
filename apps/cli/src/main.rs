mod commands;
mod config;
mod main_lib;

use clap::Parser;
use commands::Commands;
use config::Config;
use main_lib::{build_state, init_tracing};

#[derive(Parser)]
#[command(
    name = "studyshare",
    about = "Browse, share and request study materials",
    version,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Use the local fixture in the data directory instead of the backend
    #[arg(long, global = true)]
    pub offline: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env();
    init_tracing(&config.log_format);

    let state = build_state(&config, cli.offline)?;
    commands::execute(&state, cli.command).await
}
