use crate::domain::entities::Anime;
use crate::domain::traits::ShardFetcher;
use crate::log_warn;
use crate::shared::errors::{AppError, AppResult};
use async_trait::async_trait;
use reqwest::Client;
use tokio::time::sleep;

use super::config::CdnConfig;
use crate::infrastructure::external::jikan::dto::JikanAnimeData;
use crate::infrastructure::external::jikan::JikanMapper;

/// Downloads one shard document per call, with the per-fetch timeout and
/// bounded retries from `CdnConfig`. Records come back already normalized.
pub struct CdnClient {
    client: Client,
    max_retries: u32,
    retry_delay: std::time::Duration,
}

impl CdnClient {
    pub fn new(config: &CdnConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent("kagami/0.1")
            .build()
            .map_err(|e| {
                AppError::ExternalServiceError(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            max_retries: config.max_retries,
            retry_delay: config.retry_delay,
        })
    }

    async fn fetch_once(&self, url: &str) -> AppResult<Vec<JikanAnimeData>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("Shard fetch failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::ExternalServiceError(format!(
                "Shard fetch returned HTTP {}",
                response.status()
            )));
        }

        response
            .json::<Vec<JikanAnimeData>>()
            .await
            .map_err(|e| AppError::SerializationError(format!("Invalid shard document: {}", e)))
    }
}

#[async_trait]
impl ShardFetcher for CdnClient {
    async fn fetch_shard(&self, url: &str) -> AppResult<Vec<Anime>> {
        let mut attempt = 0;
        loop {
            match self.fetch_once(url).await {
                Ok(batch) => {
                    return Ok(batch.into_iter().map(JikanMapper::to_domain).collect());
                }
                Err(err) if attempt < self.max_retries => {
                    attempt += 1;
                    log_warn!(
                        "Shard {} attempt {}/{} failed: {}",
                        url,
                        attempt,
                        self.max_retries,
                        err
                    );
                    sleep(self.retry_delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
