//! Courtesy throttle toward upstreams with a usage policy

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

/// Default minimum interval between outbound geocode requests
pub const DEFAULT_COURTESY_INTERVAL: Duration = Duration::from_secs(1);

/// Allows at most one outbound request to start per `interval`.
///
/// Callers queue on the mutex; each waits until `interval` has passed since
/// the previous grant. Best effort only: there is no fairness beyond the
/// mutex and no deduplication of identical requests.
#[derive(Debug)]
pub struct CourtesyThrottle {
    interval: Duration,
    last_start: Mutex<Option<Instant>>,
}

impl CourtesyThrottle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_start: Mutex::new(None),
        }
    }

    /// Waits for the next free slot and claims it
    pub async fn acquire(&self) {
        let mut last_start = self.last_start.lock().await;

        if let Some(previous) = *last_start {
            let ready_at = previous + self.interval;

            if ready_at > Instant::now() {
                debug!(
                    wait_ms = (ready_at - Instant::now()).as_millis() as u64,
                    "Courtesy delay before upstream request"
                );
                tokio::time::sleep_until(ready_at).await;
            }
        }

        *last_start = Some(Instant::now());
    }
}

impl Default for CourtesyThrottle {
    fn default() -> Self {
        Self::new(DEFAULT_COURTESY_INTERVAL)
    }
}
