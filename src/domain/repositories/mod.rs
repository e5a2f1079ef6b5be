mod anime_cache_repository;
mod backup_progress_repository;
mod search_cache_repository;

pub use anime_cache_repository::{AnimeCacheRepository, UpsertOutcome};
pub use backup_progress_repository::BackupProgressRepository;
pub use search_cache_repository::SearchCacheRepository;
