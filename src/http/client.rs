use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;
use tokio::time::sleep;

/// HTTP client with built-in rate limiting and basic auth for the
/// Challonge v1 API.
pub struct RateLimitedClient {
    client: Client,
    username: String,
    api_key: String,
    delay: Duration,
    request_count: usize,
}

impl RateLimitedClient {
    pub fn new(
        user_agent: &str,
        timeout_secs: u64,
        rate_limit_ms: u64,
        username: String,
        api_key: String,
    ) -> Result<Self> {
        let client = Self::build_client(user_agent, timeout_secs)?;

        Ok(Self {
            client,
            username,
            api_key,
            delay: Duration::from_millis(rate_limit_ms),
            request_count: 0,
        })
    }

    pub async fn get(&mut self, url: &str) -> Result<reqwest::Response> {
        self.wait().await;
        self.send_get_request(url).await
    }

    fn build_client(user_agent: &str, timeout_secs: u64) -> Result<Client> {
        Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to build HTTP client")
    }

    // The first request goes out immediately; every later one waits out the
    // configured delay first.
    async fn wait(&mut self) {
        if self.request_count > 0 {
            sleep(self.delay).await;
        }
        self.request_count += 1;
    }

    async fn send_get_request(&self, url: &str) -> Result<reqwest::Response> {
        self.client
            .get(url)
            .basic_auth(&self.username, Some(&self.api_key))
            .send()
            .await
            .context("Failed to send GET request")
    }
}
