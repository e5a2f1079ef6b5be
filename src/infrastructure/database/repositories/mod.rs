mod anime_cache_repository_impl;
mod backup_progress_repository_impl;
mod search_cache_repository_impl;

pub use anime_cache_repository_impl::AnimeCacheRepositoryImpl;
pub use backup_progress_repository_impl::BackupProgressRepositoryImpl;
pub use search_cache_repository_impl::SearchCacheRepositoryImpl;
