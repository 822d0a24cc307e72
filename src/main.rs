use clap::Parser;
use routetable::cli::{run_cli, Cli};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    routetable::logging::init_logging()?;
    run_cli(cli)
}
