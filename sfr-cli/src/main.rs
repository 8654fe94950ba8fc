//! SFR CLI - soil nutrient status and fertilizer recommendations from the command line.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "sfr-cli",
    version,
    about = "Soil fertility recommendation toolkit"
)]
struct Cli {
    #[command(flatten)]
    settings: sfr_cmd::Settings,

    #[command(subcommand)]
    command: sfr_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("running {:?}", cli.command);
    sfr_cmd::run(&cli.settings, cli.command)
}
