use crate::domain::entities::BackupProgress;
use crate::shared::errors::AppResult;
use async_trait::async_trait;

/// Durable, independently readable store of crawl checkpoints; one row per
/// job type.
#[async_trait]
pub trait BackupProgressRepository: Send + Sync {
    async fn find(&self, job_type: &str) -> AppResult<Option<BackupProgress>>;
    /// Insert or replace the row for `progress.job_type`.
    async fn save(&self, progress: &BackupProgress) -> AppResult<()>;
}
