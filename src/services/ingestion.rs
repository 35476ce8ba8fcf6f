use anyhow::Result;
use log::info;

use crate::api::ChallongeClient;
use crate::cache::Cache;
use crate::config::settings::AppConfig;

/// Pulls one edition's raw data from Challonge into the local cache.
pub struct FetchService {
    cache: Cache,
    api_client: ChallongeClient,
    config: AppConfig,
}

impl FetchService {
    pub fn new(config: AppConfig) -> Result<Self> {
        Ok(Self {
            cache: Cache::new(&config.storage.cache_dir)?,
            api_client: ChallongeClient::new(&config.api)?,
            config,
        })
    }

    pub async fn run(&mut self, edition: u32) -> Result<()> {
        info!("=== Starting Edition Fetch ===\n");

        let slug = self.config.series.edition_slug(edition);
        info!("Step 1: Resolving tournament for {}...", slug);

        let tournament_id = self
            .api_client
            .fetch_and_cache_edition(edition, &slug, &self.cache)
            .await?;
        info!("  → Cached edition {} (tournament {})\n", edition, tournament_id);

        info!("=== Fetch Complete ===");
        Ok(())
    }
}
