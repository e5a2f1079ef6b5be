mod anime;
mod backup_progress;
mod genre;

pub use anime::{Anime, AnimeImages, ImageSet, Trailer};
pub use backup_progress::{BackupProgress, BackupStatus};
pub use genre::Genre;
