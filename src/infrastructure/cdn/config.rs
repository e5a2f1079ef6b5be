use crate::shared::errors::{AppError, AppResult};
use std::env;
use std::time::Duration;

/// The sharded catalog export published alongside the upstream API.
const DEFAULT_SHARD_URLS: [&str; 10] = [
    "https://cdn.jsdelivr.net/gh/Ghellsing007/api-anime@main/anime_data_part1.json",
    "https://cdn.jsdelivr.net/gh/Ghellsing007/api-anime@main/anime_data_part2.json",
    "https://cdn.jsdelivr.net/gh/Ghellsing007/api-anime@main/anime_data_part3.json",
    "https://cdn.jsdelivr.net/gh/Ghellsing007/api-anime@main/anime_data_part4.json",
    "https://cdn.jsdelivr.net/gh/Ghellsing007/api-anime@main/anime_data_part5.json",
    "https://cdn.jsdelivr.net/gh/Ghellsing007/api-anime@main/anime_data_part6.json",
    "https://cdn.jsdelivr.net/gh/Ghellsing007/api-anime@main/anime_data_part7.json",
    "https://cdn.jsdelivr.net/gh/Ghellsing007/api-anime@main/anime_data_part8.json",
    "https://cdn.jsdelivr.net/gh/Ghellsing007/api-anime@main/anime_data_part9.json",
    "https://cdn.jsdelivr.net/gh/Ghellsing007/api-anime@main/anime_data_part10.json",
];

/// Shard download and snapshot lifecycle settings, environment-overridable.
#[derive(Debug, Clone)]
pub struct CdnConfig {
    pub urls: Vec<String>,
    pub timeout: Duration,
    pub max_retries: u32,
    pub retry_delay: Duration,
    /// Snapshot age after which `preload` refreshes instead of serving the
    /// cached snapshot.
    pub reload_interval: Duration,
}

impl Default for CdnConfig {
    fn default() -> Self {
        Self {
            urls: DEFAULT_SHARD_URLS.iter().map(|s| s.to_string()).collect(),
            timeout: Duration::from_secs(30),
            max_retries: 3,
            retry_delay: Duration::from_millis(1000),
            reload_interval: Duration::from_secs(6 * 60 * 60),
        }
    }
}

impl CdnConfig {
    pub fn from_env() -> AppResult<Self> {
        let defaults = Self::default();

        let urls = match env::var("KAGAMI_CDN_URLS") {
            Ok(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            Err(_) => defaults.urls,
        };

        if urls.is_empty() {
            return Err(AppError::ConfigError(
                "KAGAMI_CDN_URLS resolved to an empty shard list".to_string(),
            ));
        }

        Ok(Self {
            urls,
            timeout: env_duration_ms("KAGAMI_CDN_TIMEOUT_MS", defaults.timeout),
            max_retries: env_u32("KAGAMI_CDN_MAX_RETRIES", defaults.max_retries),
            retry_delay: env_duration_ms("KAGAMI_CDN_RETRY_DELAY_MS", defaults.retry_delay),
            reload_interval: env_duration_ms(
                "KAGAMI_CDN_RELOAD_INTERVAL_MS",
                defaults.reload_interval,
            ),
        })
    }
}

fn env_duration_ms(name: &str, default: Duration) -> Duration {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(default)
}

fn env_u32(name: &str, default: u32) -> u32 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(default)
}
