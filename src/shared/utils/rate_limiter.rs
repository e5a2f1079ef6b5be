use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

/// Minimum-interval throttle shared by all calls into one upstream client.
pub struct RateLimiter {
    last_request: Arc<Mutex<Instant>>,
    min_interval: Duration,
}

impl RateLimiter {
    pub fn new(requests_per_second: f64) -> Self {
        let min_interval = Duration::from_secs_f64(1.0 / requests_per_second);
        Self {
            last_request: Arc::new(Mutex::new(Instant::now() - min_interval)),
            min_interval,
        }
    }

    pub async fn wait(&self) {
        let mut last = self.last_request.lock().await;
        let now = Instant::now();
        let elapsed = now.duration_since(*last);

        if elapsed < self.min_interval {
            sleep(self.min_interval - elapsed).await;
        }

        *last = Instant::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consecutive_calls_are_spaced_by_the_minimum_interval() {
        tokio_test::block_on(async {
            let limiter = RateLimiter::new(50.0); // 20ms between requests

            // The first call is free; the next two must each wait.
            let start = Instant::now();
            limiter.wait().await;
            limiter.wait().await;
            limiter.wait().await;

            assert!(start.elapsed() >= Duration::from_millis(40));
        });
    }
}
