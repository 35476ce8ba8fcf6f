use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about = "cup-archive tournament ingestion tool")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Create the archive database tables
    Setup,
    /// Fetch participant and match data for one edition from Challonge into the local cache
    Fetch {
        /// Edition number within the cup series
        #[arg(short, long)]
        edition: u32,
    },
    /// Normalize one cached edition and insert it into the archive database
    Ingest {
        /// Edition number within the cup series
        #[arg(short, long)]
        edition: u32,
    },
    /// Ingest every cached edition from 1 through the given number
    Backfill {
        /// Highest edition number to ingest
        #[arg(short, long)]
        through: u32,
    },
}
