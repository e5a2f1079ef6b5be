use crate::domain::repositories::SearchCacheRepository;
use crate::infrastructure::database::connection::DbPool;
use crate::infrastructure::database::models::SearchCacheModel;
use crate::infrastructure::database::schema::search_cache;
use crate::shared::errors::{AppError, AppResult};
use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;

pub struct SearchCacheRepositoryImpl {
    pool: DbPool,
}

impl SearchCacheRepositoryImpl {
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
impl SearchCacheRepository for SearchCacheRepositoryImpl {
    async fn get(&self, query: &str) -> AppResult<Option<serde_json::Value>> {
        let mut conn = self.get_conn()?;

        let row: Option<SearchCacheModel> = search_cache::table
            .find(query.to_lowercase())
            .first(&mut conn)
            .optional()
            .map_err(|e| AppError::DatabaseError(format!("Failed to load search cache: {}", e)))?;

        Ok(row.map(|r| r.results))
    }

    async fn put(&self, query: &str, results: serde_json::Value) -> AppResult<()> {
        let mut conn = self.get_conn()?;

        let model = SearchCacheModel {
            query: query.to_lowercase(),
            results,
            updated_at: Utc::now(),
        };

        diesel::insert_into(search_cache::table)
            .values(&model)
            .on_conflict(search_cache::query)
            .do_update()
            .set((
                search_cache::results.eq(&model.results),
                search_cache::updated_at.eq(model.updated_at),
            ))
            .execute(&mut conn)
            .map_err(|e| AppError::DatabaseError(format!("Failed to store search cache: {}", e)))?;

        Ok(())
    }

    async fn remove(&self, query: &str) -> AppResult<bool> {
        let mut conn = self.get_conn()?;

        let deleted = diesel::delete(search_cache::table.find(query.to_lowercase()))
            .execute(&mut conn)
            .map_err(|e| AppError::DatabaseError(format!("Failed to remove search cache: {}", e)))?;

        Ok(deleted > 0)
    }

    async fn count(&self) -> AppResult<u64> {
        let mut conn = self.get_conn()?;

        let count: i64 = search_cache::table
            .count()
            .get_result(&mut conn)
            .map_err(|e| AppError::DatabaseError(format!("Failed to count search cache: {}", e)))?;

        Ok(count.max(0) as u64)
    }

    async fn clear(&self) -> AppResult<u64> {
        let mut conn = self.get_conn()?;

        let deleted = diesel::delete(search_cache::table)
            .execute(&mut conn)
            .map_err(|e| AppError::DatabaseError(format!("Failed to clear search cache: {}", e)))?;

        Ok(deleted as u64)
    }
}
