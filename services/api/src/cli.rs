use crate::catalog::{run_catalog_rank, run_dimensions, run_score, CatalogRankArgs, ScoreArgs};
use crate::server;
use buildmart::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "buildmart",
    about = "Run the player build marketplace service and its playstyle tools",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score one buyer playstyle against one build DNA
    Score(ScoreArgs),
    /// Print the playstyle onboarding questions
    Dimensions,
    /// Work with seller catalog spreadsheets
    Catalog {
        #[command(subcommand)]
        command: CatalogCommand,
    },
}

#[derive(Subcommand, Debug)]
enum CatalogCommand {
    /// Rank every build in a catalog CSV for a buyer playstyle
    Rank(CatalogRankArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Score(args) => run_score(args),
        Command::Dimensions => run_dimensions(),
        Command::Catalog {
            command: CatalogCommand::Rank(args),
        } => run_catalog_rank(args),
    }
}
