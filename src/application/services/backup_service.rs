use crate::domain::entities::{BackupProgress, BackupStatus};
use crate::domain::repositories::{AnimeCacheRepository, BackupProgressRepository, UpsertOutcome};
use crate::domain::traits::AnimeProviderClient;
use crate::infrastructure::external::jikan::dto::JikanRecordKey;
use crate::shared::errors::{AppError, AppResult};
use crate::{log_error, log_info, log_warn};
use chrono::Utc;
use serde::Serialize;
use std::env;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::sleep;

pub const FULL_BACKUP_JOB: &str = "full_anime_backup";

/// Crawl pacing, environment-overridable.
#[derive(Debug, Clone)]
pub struct BackupConfig {
    pub page_size: u32,
    /// Fixed pause between page fetches; the upstream enforces a rate limit.
    pub page_delay: Duration,
    /// Emit aggregate throughput/ETA statistics every this many pages.
    pub stats_interval: u32,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            page_size: 25,
            page_delay: Duration::from_millis(1000),
            stats_interval: 50,
        }
    }
}

impl BackupConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            page_size: env_u32("KAGAMI_BACKUP_PAGE_SIZE", defaults.page_size),
            page_delay: env::var("KAGAMI_BACKUP_PAGE_DELAY_MS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.page_delay),
            stats_interval: env_u32("KAGAMI_BACKUP_STATS_INTERVAL", defaults.stats_interval)
                .max(1),
        }
    }
}

fn env_u32(name: &str, default: u32) -> u32 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(default)
}

/// Summary of one completed crawl run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupRunStats {
    pub processed: u64,
    pub created: u64,
    pub updated: u64,
    pub pages: u32,
    pub elapsed_seconds: u64,
    pub average_payload_bytes: u64,
}

/// Durable-store view for the operational surface.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupStoreStats {
    pub total_records: u64,
    pub last_progress: Option<BackupProgress>,
}

/// Walks the upstream catalog page by page and mirrors every record into
/// the durable store.
///
/// Pages are strictly sequential with a fixed inter-page delay. Progress is
/// checkpointed after every page, so an interrupted run resumes at the page
/// after the last confirmed one. Upserts make re-runs convergent: records
/// already mirrored are simply rewritten with identical data.
pub struct BackupService {
    provider: Arc<dyn AnimeProviderClient>,
    anime_cache: Arc<dyn AnimeCacheRepository>,
    progress_repo: Arc<dyn BackupProgressRepository>,
    config: BackupConfig,
}

impl BackupService {
    pub fn new(
        provider: Arc<dyn AnimeProviderClient>,
        anime_cache: Arc<dyn AnimeCacheRepository>,
        progress_repo: Arc<dyn BackupProgressRepository>,
        config: BackupConfig,
    ) -> Self {
        Self {
            provider,
            anime_cache,
            progress_repo,
            config,
        }
    }

    /// Run the full catalog crawl to completion.
    ///
    /// A failed page or record is logged and skipped; the run only fails as
    /// a whole when the upstream pagination probe or the progress store is
    /// unavailable, and that failure is persisted rather than lost.
    pub async fn run_full_backup(&self) -> AppResult<BackupRunStats> {
        match self.execute().await {
            Ok(stats) => Ok(stats),
            Err(err) => {
                self.mark_failed(&err).await;
                Err(err)
            }
        }
    }

    /// Read-only progress accessor, usable mid-run or after.
    pub async fn progress(&self) -> AppResult<Option<BackupProgress>> {
        self.progress_repo.find(FULL_BACKUP_JOB).await
    }

    pub async fn backup_stats(&self) -> AppResult<BackupStoreStats> {
        Ok(BackupStoreStats {
            total_records: self.anime_cache.count().await?,
            last_progress: self.progress().await?,
        })
    }

    async fn execute(&self) -> AppResult<BackupRunStats> {
        log_info!("Starting full anime backup");

        let info = self.provider.pagination_info(self.config.page_size).await?;
        let total_pages = info.last_visible_page;
        let total_items = info.total_items;
        log_info!(
            "Upstream reports {} pages, {} records",
            total_pages,
            total_items
        );

        // Create, resume, or reset the singleton progress row.
        let existing = self.progress_repo.find(FULL_BACKUP_JOB).await?;
        let (mut progress, start_page) = match existing {
            Some(mut prior) if prior.is_resumable() => {
                let start = prior.current_page + 1;
                log_info!(
                    "Resuming interrupted backup at page {} ({} records already mirrored)",
                    start,
                    prior.processed_items
                );
                prior.total_pages = total_pages;
                prior.total_items = total_items;
                (prior, start)
            }
            _ => (BackupProgress::start(FULL_BACKUP_JOB, total_pages, total_items), 1),
        };
        self.progress_repo.save(&progress).await?;

        let started = Instant::now();
        let resumed_base = progress.processed_items;
        let mut created = 0u64;
        let mut updated = 0u64;
        let mut payload_bytes = 0u64;

        for page in start_page..=total_pages {
            match self.provider.fetch_page(page, self.config.page_size).await {
                Ok(raw) => {
                    for record in raw.records {
                        match self.store_record(record).await {
                            Ok((outcome, size)) => {
                                match outcome {
                                    UpsertOutcome::Created => created += 1,
                                    UpsertOutcome::Updated => updated += 1,
                                }
                                payload_bytes += size;
                                progress.processed_items += 1;
                            }
                            Err(err) => {
                                // One bad record never aborts its page.
                                log_error!("Record on page {} failed: {}", page, err);
                            }
                        }
                    }
                }
                Err(err) => {
                    // One bad page never aborts the crawl.
                    log_error!("Page {}/{} failed: {}", page, total_pages, err);
                }
            }

            // Checkpoint: a crash after this save resumes at page + 1.
            progress.current_page = page;
            self.progress_repo.save(&progress).await?;

            if page % self.config.stats_interval == 0 {
                let pages_done = page - start_page + 1;
                self.log_throughput(&progress, started, resumed_base, payload_bytes, page, pages_done);
            }

            if page < total_pages {
                sleep(self.config.page_delay).await;
            }
        }

        progress.status = BackupStatus::Completed;
        progress.completed_at = Some(Utc::now());
        self.progress_repo.save(&progress).await?;

        let processed = progress.processed_items - resumed_base;
        let stats = BackupRunStats {
            processed,
            created,
            updated,
            pages: total_pages.saturating_sub(start_page - 1),
            elapsed_seconds: started.elapsed().as_secs(),
            average_payload_bytes: if processed > 0 {
                payload_bytes / processed
            } else {
                0
            },
        };

        log_info!(
            "Backup completed: {} processed ({} new, {} updated) across {} pages in {}s",
            stats.processed,
            stats.created,
            stats.updated,
            stats.pages,
            stats.elapsed_seconds
        );

        Ok(stats)
    }

    /// Persist one verbatim payload, keyed by its external id.
    async fn store_record(&self, record: serde_json::Value) -> AppResult<(UpsertOutcome, u64)> {
        let key: JikanRecordKey = serde_json::from_value(record.clone())
            .map_err(|e| AppError::InvalidInput(format!("Record without usable mal_id: {}", e)))?;

        let size = record.to_string().len() as u64;
        let outcome = self.anime_cache.upsert(key.mal_id, record).await?;
        Ok((outcome, size))
    }

    fn log_throughput(
        &self,
        progress: &BackupProgress,
        started: Instant,
        resumed_base: u64,
        payload_bytes: u64,
        page: u32,
        pages_done: u32,
    ) {
        let elapsed = started.elapsed();
        let run_processed = progress.processed_items - resumed_base;
        let speed = run_processed as f64 / elapsed.as_secs_f64().max(0.001);
        let avg_page = elapsed / pages_done.max(1);
        let remaining = progress.total_pages.saturating_sub(page);
        let eta_secs = (avg_page * remaining).as_secs();
        let avg_payload_kb = if run_processed > 0 {
            payload_bytes as f64 / run_processed as f64 / 1024.0
        } else {
            0.0
        };

        log_info!(
            "Backup progress: page {}/{} | {}/{} records | {:.1} records/s | avg payload {:.1} KB | ETA {}m{}s",
            page,
            progress.total_pages,
            progress.processed_items,
            progress.total_items,
            speed,
            avg_payload_kb,
            eta_secs / 60,
            eta_secs % 60
        );
    }

    /// Best effort: a failed run must stay inspectable, not vanish.
    async fn mark_failed(&self, error: &AppError) {
        match self.progress_repo.find(FULL_BACKUP_JOB).await {
            Ok(Some(mut progress)) => {
                progress.status = BackupStatus::Failed;
                progress.last_error = Some(error.to_string());
                if let Err(save_err) = self.progress_repo.save(&progress).await {
                    log_error!("Could not persist backup failure: {}", save_err);
                }
            }
            Ok(None) => {
                log_warn!("Backup failed before any progress was recorded: {}", error);
            }
            Err(find_err) => {
                log_error!("Could not load backup progress after failure: {}", find_err);
            }
        }
    }
}
