use anyhow::{Context, Result};
use log::info;
use serde_json::Value;

use crate::cache::Cache;
use crate::config::settings::ApiSettings;
use crate::domain::models::TournamentEnvelope;
use crate::errors;
use crate::http::RateLimitedClient;

/// Challonge v1 API client
pub struct ChallongeClient {
    client: RateLimitedClient,
    base_url: String,
}

impl ChallongeClient {
    /// Create a new client. Credentials come from the `CHALLONGE_USER` and
    /// `CHALLONGE_API_KEY` environment variables.
    pub fn new(settings: &ApiSettings) -> Result<Self> {
        let username = std::env::var("CHALLONGE_USER").context("CHALLONGE_USER is not set")?;
        let api_key = std::env::var("CHALLONGE_API_KEY").context("CHALLONGE_API_KEY is not set")?;

        let client = RateLimitedClient::new(
            settings.user_agent,
            settings.timeout_secs,
            settings.rate_limit_ms,
            username,
            api_key,
        )?;

        Ok(Self {
            client,
            base_url: settings.base_url.to_string(),
        })
    }

    /// Resolve the tournament id whose URL slug matches the given edition
    /// slug, from the account's tournament index.
    pub async fn find_tournament_id(&mut self, slug: &str) -> Result<i64> {
        let url = self.build_index_url();
        info!("Resolving slug {} via {}", slug, url);

        let index = self.get_value(&url).await?;
        let tournaments: Vec<TournamentEnvelope> = serde_json::from_value(index)
            .context(errors::parse_context("tournament index"))?;

        tournaments
            .iter()
            .map(|envelope| &envelope.tournament)
            .find(|t| t.url == slug)
            .map(|t| t.id)
            .with_context(|| format!("No tournament found for slug {slug:?}"))
    }

    /// Fetch both record sets for an edition and store the raw JSON in the
    /// cache. Returns the resolved tournament id.
    pub async fn fetch_and_cache_edition(
        &mut self,
        edition: u32,
        slug: &str,
        cache: &Cache,
    ) -> Result<i64> {
        let tournament_id = self.find_tournament_id(slug).await?;
        info!("Resolved {} to tournament {}", slug, tournament_id);

        let participants = self.fetch_participants(tournament_id).await?;
        cache.save_participants(edition, &participants)?;

        let matches = self.fetch_matches(tournament_id).await?;
        cache.save_matches(edition, &matches)?;

        Ok(tournament_id)
    }

    pub async fn fetch_participants(&mut self, tournament_id: i64) -> Result<Value> {
        let url = self.build_participants_url(tournament_id);
        info!("Fetching participants for tournament {}", tournament_id);
        self.get_value(&url).await
    }

    pub async fn fetch_matches(&mut self, tournament_id: i64) -> Result<Value> {
        let url = self.build_matches_url(tournament_id);
        info!("Fetching matches for tournament {}", tournament_id);
        self.get_value(&url).await
    }

    // --- Helper Methods ---

    async fn get_value(&mut self, url: &str) -> Result<Value> {
        let response = self.client.get(url).await?;

        if !response.status().is_success() {
            anyhow::bail!("API returned status: {}", response.status());
        }

        let text = response
            .text()
            .await
            .with_context(|| errors::fetch_context(url))?;

        serde_json::from_str(&text).context(errors::parse_context("Challonge response"))
    }

    fn build_index_url(&self) -> String {
        format!("{}/tournaments.json", self.base_url)
    }

    fn build_participants_url(&self, tournament_id: i64) -> String {
        format!("{}/tournaments/{}/participants.json", self.base_url, tournament_id)
    }

    fn build_matches_url(&self, tournament_id: i64) -> String {
        format!("{}/tournaments/{}/matches.json", self.base_url, tournament_id)
    }
}
