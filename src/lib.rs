pub mod api;
pub mod cache;
pub mod cli;
pub mod config;
pub mod database;
pub mod domain;
pub mod errors;
pub mod http;
pub mod roster;
pub mod services;

use anyhow::Result;
use clap::Parser;
use cli::Cli;

use crate::cli::Command;
use crate::config::settings::AppConfig;
use crate::services::archive::ArchiveService;
use crate::services::ingestion::FetchService;

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_setup() -> Result<()> {
    let config = AppConfig::new();
    let service = ArchiveService::new(config)?;
    service.setup()
}

pub fn handle_fetch(edition: u32) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let config = AppConfig::new();
        let mut service = FetchService::new(config)?;
        service.run(edition).await
    })
}

pub fn handle_ingest(edition: u32) -> Result<()> {
    let config = AppConfig::new();
    let service = ArchiveService::new(config)?;
    service.ingest_edition(edition)
}

pub fn handle_backfill(through: u32) -> Result<()> {
    let config = AppConfig::new();
    let service = ArchiveService::new(config)?;
    service.backfill(through)
}
