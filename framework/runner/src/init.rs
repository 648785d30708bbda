use crate::cli::SweepCli;
use clap::Parser;

/// Initialise the CLI and logging for the dyno runner.
pub fn init() -> SweepCli {
    env_logger::init();

    SweepCli::parse()
}
