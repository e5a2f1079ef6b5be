use crate::domain::entities::BackupProgress;
use crate::domain::repositories::BackupProgressRepository;
use crate::infrastructure::database::connection::DbPool;
use crate::infrastructure::database::models::BackupProgressModel;
use crate::infrastructure::database::schema::backup_progress;
use crate::shared::errors::{AppError, AppResult};
use async_trait::async_trait;
use diesel::prelude::*;

pub struct BackupProgressRepositoryImpl {
    pool: DbPool,
}

impl BackupProgressRepositoryImpl {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn get_conn(
        &self,
    ) -> AppResult<
        diesel::r2d2::PooledConnection<diesel::r2d2::ConnectionManager<diesel::PgConnection>>,
    > {
        self.pool
            .get()
            .map_err(|e| AppError::DatabaseError(format!("Failed to get connection: {}", e)))
    }
}

#[async_trait]
impl BackupProgressRepository for BackupProgressRepositoryImpl {
    async fn find(&self, job_type: &str) -> AppResult<Option<BackupProgress>> {
        let mut conn = self.get_conn()?;

        let row: Option<BackupProgressModel> = backup_progress::table
            .find(job_type)
            .first(&mut conn)
            .optional()
            .map_err(|e| {
                AppError::DatabaseError(format!("Failed to load backup progress: {}", e))
            })?;

        Ok(row.map(BackupProgressModel::into_domain))
    }

    async fn save(&self, progress: &BackupProgress) -> AppResult<()> {
        let mut conn = self.get_conn()?;

        let model = BackupProgressModel::from_domain(progress);

        diesel::insert_into(backup_progress::table)
            .values(&model)
            .on_conflict(backup_progress::job_type)
            .do_update()
            .set(&model)
            .execute(&mut conn)
            .map_err(|e| {
                AppError::DatabaseError(format!("Failed to save backup progress: {}", e))
            })?;

        Ok(())
    }
}
