//! Entry point for the `clouds` binary: parses the CLI, initialises tracing,
//! and either opens the cloud window or runs a headless subcommand.

mod cli;
mod run;

use anyhow::Result;
use cli::{Command, ShadersAction};

fn main() -> Result<()> {
    let cli = cli::parse();
    run::initialise_tracing();

    match cli.command {
        Some(Command::Shaders(shaders_cmd)) => match shaders_cmd.action {
            ShadersAction::Check => run::check_shaders(),
        },
        None => run::run(cli.run),
    }
}
