//! Command line inspector for the common map configuration.

mod input;
mod tools;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{ErrorLevel, Verbosity};

#[derive(Parser, Debug)]
#[command(
    name = "spatial-map",
    author,
    version,
    about,
    long_about = None,
    propagate_version = true,
    disable_help_subcommand = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    verbose: Verbosity<ErrorLevel>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the layers of a multilayer map configuration
    Layers(tools::layers::Subcommand),

    /// Show how the map would be created from a configuration
    Plan(tools::plan::Subcommand),

    /// Print the URL of a single tile of the base layer
    TileUrl(tools::tile_url::Subcommand),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.verbose.log_level_filter())
        .format_timestamp(None)
        .init();

    let output = run(cli)?;
    println!("{output}");
    Ok(())
}

fn run(cli: Cli) -> Result<String> {
    match &cli.command {
        Commands::Layers(arguments) => tools::layers::run(arguments),
        Commands::Plan(arguments) => tools::plan::run(arguments),
        Commands::TileUrl(arguments) => tools::tile_url::run(arguments),
    }
}
