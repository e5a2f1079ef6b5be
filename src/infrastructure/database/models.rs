use crate::domain::entities::{BackupProgress, BackupStatus};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_derive_enum::DbEnum;

use super::schema::{anime_cache, backup_progress, search_cache};

#[derive(DbEnum, Debug, Clone, Copy, PartialEq, Eq)]
#[ExistingTypePath = "crate::infrastructure::database::schema::sql_types::BackupStatus"]
pub enum BackupStatusDb {
    Running,
    Completed,
    Failed,
}

impl From<BackupStatus> for BackupStatusDb {
    fn from(status: BackupStatus) -> Self {
        match status {
            BackupStatus::Running => Self::Running,
            BackupStatus::Completed => Self::Completed,
            BackupStatus::Failed => Self::Failed,
        }
    }
}

impl From<BackupStatusDb> for BackupStatus {
    fn from(status: BackupStatusDb) -> Self {
        match status {
            BackupStatusDb::Running => Self::Running,
            BackupStatusDb::Completed => Self::Completed,
            BackupStatusDb::Failed => Self::Failed,
        }
    }
}

#[derive(Queryable, Insertable, Debug, Clone)]
#[diesel(table_name = anime_cache)]
pub struct AnimeCacheModel {
    pub anime_id: i32,
    pub data: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}

#[derive(Queryable, Insertable, Debug, Clone)]
#[diesel(table_name = search_cache)]
pub struct SearchCacheModel {
    pub query: String,
    pub results: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}

#[derive(Queryable, Insertable, AsChangeset, Debug, Clone)]
#[diesel(table_name = backup_progress)]
#[diesel(treat_none_as_null = true)]
pub struct BackupProgressModel {
    pub job_type: String,
    pub current_page: i32,
    pub total_pages: i32,
    pub total_items: i64,
    pub processed_items: i64,
    pub status: BackupStatusDb,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

impl BackupProgressModel {
    pub fn from_domain(progress: &BackupProgress) -> Self {
        Self {
            job_type: progress.job_type.clone(),
            current_page: progress.current_page as i32,
            total_pages: progress.total_pages as i32,
            total_items: progress.total_items as i64,
            processed_items: progress.processed_items as i64,
            status: progress.status.into(),
            started_at: progress.started_at,
            completed_at: progress.completed_at,
            last_error: progress.last_error.clone(),
        }
    }

    pub fn into_domain(self) -> BackupProgress {
        BackupProgress {
            job_type: self.job_type,
            current_page: self.current_page.max(0) as u32,
            total_pages: self.total_pages.max(0) as u32,
            total_items: self.total_items.max(0) as u64,
            processed_items: self.processed_items.max(0) as u64,
            status: self.status.into(),
            started_at: self.started_at,
            completed_at: self.completed_at,
            last_error: self.last_error,
        }
    }
}
