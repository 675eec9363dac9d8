use std::time::Duration;
use thiserror::Error;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("No message received for {interval:?}")]
pub struct WatchdogExpired {
    pub interval: Duration,
}

/// Liveness timer for the receive loop.
///
/// `run` completes with an error once `interval` passes without a `reset`.
/// A reset issued while `run` is between waits is kept as a permit, so a
/// message is never missed.
#[derive(Debug)]
pub struct Watchdog {
    interval: Duration,
    feed: Notify,
}

impl Watchdog {
    pub fn new(interval: Duration) -> Self {
        Watchdog {
            interval,
            feed: Notify::new(),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Re-arm the timer
    pub fn reset(&self) {
        self.feed.notify_one();
    }

    /// Returns `Ok` when cancelled, `Err` when the timer fires
    pub async fn run(&self, cancel: &CancellationToken) -> Result<(), WatchdogExpired> {
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Ok(()),
                _ = self.feed.notified() => continue,
                _ = tokio::time::sleep(self.interval) => {
                    return Err(WatchdogExpired { interval: self.interval });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_fires_after_interval() {
        let watchdog = Watchdog::new(Duration::from_secs(60));
        let cancel = CancellationToken::new();
        let start = Instant::now();

        let result = watchdog.run(&cancel).await;

        assert_eq!(
            result,
            Err(WatchdogExpired {
                interval: Duration::from_secs(60)
            })
        );
        assert!(start.elapsed() >= Duration::from_secs(60));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_extends_deadline() {
        let watchdog = Arc::new(Watchdog::new(Duration::from_secs(1)));
        let cancel = CancellationToken::new();
        let start = Instant::now();

        let feeder = Arc::clone(&watchdog);
        tokio::spawn(async move {
            for _ in 0..3 {
                tokio::time::sleep(Duration::from_millis(800)).await;
                feeder.reset();
            }
        });

        assert!(watchdog.run(&cancel).await.is_err());
        // Last reset at 2.4s, expiry one interval later
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(3400));
        assert!(elapsed < Duration::from_millis(3500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_cleanly() {
        let watchdog = Watchdog::new(Duration::from_secs(60));
        let cancel = CancellationToken::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            trigger.cancel();
        });

        assert_eq!(watchdog.run(&cancel).await, Ok(()));
    }
}
