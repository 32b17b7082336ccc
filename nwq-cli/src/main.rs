//! NWQ CLI - water quality map, statistics and sensor payloads as JSON.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "nwq-cli",
    version,
    about = "Groundwater quality survey toolkit"
)]
struct Cli {
    #[command(flatten)]
    data: nwq_cmd::DataArgs,

    #[command(subcommand)]
    command: nwq_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    nwq_cmd::run(&cli.data, cli.command)
}
