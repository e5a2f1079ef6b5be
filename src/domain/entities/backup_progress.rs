use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One singleton row per job type tracking a long-running backup crawl.
///
/// Created on the first run, updated once per page, finalized on
/// completion or failure, and reset (not deleted) when a new run starts.
/// A row still in `Running` state at startup marks an interrupted run and
/// is the crawler's resume checkpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupProgress {
    pub job_type: String,
    pub current_page: u32,
    pub total_pages: u32,
    pub total_items: u64,
    pub processed_items: u64,
    pub status: BackupStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackupStatus {
    Running,
    Completed,
    Failed,
}

impl BackupProgress {
    /// Fresh progress record for a run starting at page 1.
    pub fn start(job_type: &str, total_pages: u32, total_items: u64) -> Self {
        Self {
            job_type: job_type.to_string(),
            current_page: 0,
            total_pages,
            total_items,
            processed_items: 0,
            status: BackupStatus::Running,
            started_at: Utc::now(),
            completed_at: None,
            last_error: None,
        }
    }

    /// An interrupted run left its row in `Running` state with at least one
    /// checkpointed page; such a run resumes instead of restarting.
    pub fn is_resumable(&self) -> bool {
        self.status == BackupStatus::Running && self.current_page > 0
    }
}
