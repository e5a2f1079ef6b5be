pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod shared;

use application::services::{
    BackupConfig, BackupService, CacheManager, CatalogService, DataSourceManager, QueryService,
};
use infrastructure::cdn::{CdnClient, CdnConfig};
use infrastructure::database::repositories::{
    AnimeCacheRepositoryImpl, BackupProgressRepositoryImpl, SearchCacheRepositoryImpl,
};
use infrastructure::database::Database;
use infrastructure::external::jikan::JikanClient;
use shared::errors::AppResult;
use std::sync::Arc;

pub use application::services::{
    BackupRunStats, BackupStoreStats, CacheClearReport, CacheStats, CatalogSnapshot, CatalogStats,
};
pub use domain::entities::{Anime, AnimeImages, BackupProgress, BackupStatus, Genre, ImageSet, Trailer};
pub use domain::value_objects::{
    DataSource, DataSourceInfo, DataSourceMode, PageInfo, RawPage, Routed, Season,
};
pub use shared::application::{PaginatedResult, PaginationParams};
pub use shared::errors::{AppError, AppResult as Result};

/// The fully wired catalog core, one instance per process.
///
/// Route handlers hold this and call into the services; nothing here owns
/// an HTTP surface.
pub struct AppServices {
    pub catalog: Arc<CatalogService>,
    pub queries: Arc<QueryService>,
    pub data_sources: Arc<DataSourceManager>,
    pub backup: Arc<BackupService>,
    pub cache: Arc<CacheManager>,
    pub database: Arc<Database>,
}

impl AppServices {
    /// Wire every service from the environment. Missing connection data
    /// (`DATABASE_URL`, an empty shard list) fails here, before any traffic
    /// is served.
    pub fn bootstrap() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        shared::utils::logger::init_logger();

        let database = Arc::new(Database::new()?);
        database.run_migrations()?;

        let cdn_config = CdnConfig::from_env()?;
        let fetcher = Arc::new(CdnClient::new(&cdn_config)?);
        let catalog = Arc::new(CatalogService::new(fetcher, cdn_config));
        let queries = Arc::new(QueryService::new(Arc::clone(&catalog)));

        let provider = Arc::new(JikanClient::new()?);
        let anime_cache = Arc::new(AnimeCacheRepositoryImpl::new(database.pool()));
        let search_cache = Arc::new(SearchCacheRepositoryImpl::new(database.pool()));
        let progress_repo = Arc::new(BackupProgressRepositoryImpl::new(database.pool()));

        let data_sources = Arc::new(DataSourceManager::new(
            Arc::clone(&queries),
            provider.clone(),
            anime_cache.clone(),
            search_cache.clone(),
        ));

        let backup = Arc::new(BackupService::new(
            provider,
            anime_cache.clone(),
            progress_repo,
            BackupConfig::from_env(),
        ));

        let cache = Arc::new(CacheManager::new(anime_cache, search_cache));

        Ok(Self {
            catalog,
            queries,
            data_sources,
            backup,
            cache,
            database,
        })
    }
}
