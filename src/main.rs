use anyhow::Result;

use cup_archive::cli::Command;
use cup_archive::{handle_backfill, handle_fetch, handle_ingest, handle_setup, interpret};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Setup => handle_setup(),
        Command::Fetch { edition } => handle_fetch(*edition),
        Command::Ingest { edition } => handle_ingest(*edition),
        Command::Backfill { through } => handle_backfill(*through),
    }
}
