//! Fixed-interval call throttle
//!
//! Consecutive calls are spaced at least `60 / calls_per_minute` seconds
//! apart. There is no burst allowance: a caller arriving early sleeps for the
//! remainder of the interval.

use std::time::Duration;

use tokio::time::{sleep_until, Instant};
use tracing::debug;

#[derive(Debug)]
pub struct Throttle {
    interval: Duration,
    last_call: Option<Instant>,
}

impl Throttle {
    /// `calls_per_minute` of zero is treated as one call per minute
    pub fn new(calls_per_minute: u32) -> Self {
        Self::with_interval(Duration::from_secs(60) / calls_per_minute.max(1))
    }

    pub fn with_interval(interval: Duration) -> Self {
        Self {
            interval,
            last_call: None,
        }
    }

    /// No spacing at all
    pub fn unlimited() -> Self {
        Self::with_interval(Duration::ZERO)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait until the next call is allowed, then claim the slot
    pub async fn acquire(&mut self) {
        if let Some(last) = self.last_call {
            let ready_at = last + self.interval;
            if ready_at > Instant::now() {
                debug!(
                    wait_ms = (ready_at - Instant::now()).as_millis() as u64,
                    "Throttling sink call"
                );
                sleep_until(ready_at).await;
            }
        }
        self.last_call = Some(Instant::now());
    }
}
