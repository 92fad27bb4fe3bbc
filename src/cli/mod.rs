//! Command-line interface.

pub mod deploy;
pub mod output;

use clap::Parser;

pub use deploy::DeployArgs;

/// Gantry - deploy app.yml services with secrets injected from the environment.
#[derive(Parser, Debug)]
#[command(
    name = "gantry",
    about = "Deploy app.yml services with secrets injected from the environment",
    version
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(flatten)]
    pub deploy: DeployArgs,
}

/// Execute the parsed command line.
pub fn execute(cli: Cli) -> crate::error::Result<()> {
    deploy::execute(cli.deploy)
}
