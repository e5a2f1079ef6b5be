use crate::domain::repositories::{AnimeCacheRepository, UpsertOutcome};
use crate::infrastructure::database::connection::DbPool;
use crate::infrastructure::database::models::AnimeCacheModel;
use crate::infrastructure::database::schema::anime_cache;
use crate::shared::errors::{AppError, AppResult};
use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;

pub struct AnimeCacheRepositoryImpl {
    pool: DbPool,
}

impl AnimeCacheRepositoryImpl {
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
impl AnimeCacheRepository for AnimeCacheRepositoryImpl {
    async fn upsert(&self, anime_id: i32, data: serde_json::Value) -> AppResult<UpsertOutcome> {
        let mut conn = self.get_conn()?;

        let updated = diesel::update(anime_cache::table.find(anime_id))
            .set((
                anime_cache::data.eq(&data),
                anime_cache::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)
            .map_err(|e| AppError::DatabaseError(format!("Failed to update anime {}: {}", anime_id, e)))?;

        if updated > 0 {
            return Ok(UpsertOutcome::Updated);
        }

        let model = AnimeCacheModel {
            anime_id,
            data,
            updated_at: Utc::now(),
        };

        diesel::insert_into(anime_cache::table)
            .values(&model)
            .on_conflict(anime_cache::anime_id)
            .do_update()
            .set((
                anime_cache::data.eq(&model.data),
                anime_cache::updated_at.eq(model.updated_at),
            ))
            .execute(&mut conn)
            .map_err(|e| AppError::DatabaseError(format!("Failed to insert anime {}: {}", anime_id, e)))?;

        Ok(UpsertOutcome::Created)
    }

    async fn find(&self, anime_id: i32) -> AppResult<Option<serde_json::Value>> {
        let mut conn = self.get_conn()?;

        let row: Option<AnimeCacheModel> = anime_cache::table
            .find(anime_id)
            .first(&mut conn)
            .optional()
            .map_err(|e| AppError::DatabaseError(format!("Failed to load anime {}: {}", anime_id, e)))?;

        Ok(row.map(|r| r.data))
    }

    async fn count(&self) -> AppResult<u64> {
        let mut conn = self.get_conn()?;

        let count: i64 = anime_cache::table
            .count()
            .get_result(&mut conn)
            .map_err(|e| AppError::DatabaseError(format!("Failed to count anime cache: {}", e)))?;

        Ok(count.max(0) as u64)
    }

    async fn clear(&self) -> AppResult<u64> {
        let mut conn = self.get_conn()?;

        let deleted = diesel::delete(anime_cache::table)
            .execute(&mut conn)
            .map_err(|e| AppError::DatabaseError(format!("Failed to clear anime cache: {}", e)))?;

        Ok(deleted as u64)
    }
}
