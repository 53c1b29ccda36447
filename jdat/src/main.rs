mod cli;
mod commands;
mod observability;
mod shell;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use jdat_build::BuildError;
use observability::TracingMode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:?}", e);
            ExitCode::from(exit_status(&e))
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let mode = match cli.command {
        None | Some(Commands::Shell { .. }) => TracingMode::Shell,
        Some(_) => TracingMode::Default,
    };
    observability::init_tracing(mode);

    match cli.command {
        None => shell::run_shell(cli.file)?,
        Some(Commands::Shell { file }) => shell::run_shell(file)?,
        Some(Commands::List { file, json }) => commands::inspect::cmd_list(&file, json)?,
        Some(Commands::Show { file, target, json }) => {
            commands::inspect::cmd_show(&file, &target, json)?
        }
        Some(Commands::Build(args)) => commands::build::cmd_build(&args)?,
    }
    Ok(())
}

/// A failed external command exits with that command's own status; anything
/// else (or a status outside 1..=255) exits with 1.
fn exit_status(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<BuildError>()
        .and_then(BuildError::exit_code)
        .and_then(|c| u8::try_from(c).ok())
        .filter(|c| *c != 0)
        .unwrap_or(1)
}
