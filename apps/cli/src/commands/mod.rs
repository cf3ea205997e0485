mod browse;
mod cards;
mod listing;
mod materials;
mod planner;
mod requests;
mod stats;
mod thanks;

use clap::Subcommand;

use crate::main_lib::AppState;

#[derive(Subcommand)]
pub enum Commands {
    /// List materials with optional filters
    #[command(aliases = &["ls"])]
    List(listing::ListingArgs),

    /// Keep the listing open and refresh it on remote changes
    Watch(listing::ListingArgs),

    /// Drill down by grade, subject and material type
    Browse(browse::BrowseArgs),

    /// Count a download and print the file URL
    Download(materials::DownloadArgs),

    /// Publish a material whose file is already hosted
    Publish(materials::PublishArgs),

    /// Community request board
    Requests(requests::RequestsArgs),

    /// Thank-you wall
    Thanks(thanks::ThanksArgs),

    /// Impact statistics and coverage gaps
    Stats,

    /// Study planner
    Planner(planner::PlannerArgs),

    /// Quick revision cards
    Cards(cards::CardsArgs),
}

pub async fn execute(state: &AppState, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::List(args) => listing::list(state, args).await,
        Commands::Watch(args) => listing::watch(state, args).await,
        Commands::Browse(args) => browse::browse(state, args).await,
        Commands::Download(args) => materials::download(state, args).await,
        Commands::Publish(args) => materials::publish(state, args).await,
        Commands::Requests(args) => requests::run(state, args).await,
        Commands::Thanks(args) => thanks::run(state, args).await,
        Commands::Stats => stats::run(state).await,
        Commands::Planner(args) => planner::run(state, args),
        Commands::Cards(args) => cards::run(state, args),
    }
}
