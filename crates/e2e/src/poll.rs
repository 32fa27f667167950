//! Bounded polling
//!
//! Re-checks a probe at a fixed interval until a condition holds or the
//! timeout elapses. Timing out is not an error: the caller gets the last
//! value it observed and asserts on that.

use std::future::Future;
use std::time::{Duration, Instant};

use tokio::time::sleep;
use tracing::debug;

use crate::error::E2eResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub timeout: Duration,
    pub interval: Duration,
}

impl PollSettings {
    pub fn new(timeout: Duration, interval: Duration) -> Self {
        Self { timeout, interval }
    }
}

/// Poll `probe` until `done` accepts its value or the timeout elapses.
///
/// Probe errors count as "nothing observed" for that round. Returns the
/// last successfully observed value, or `None` if every probe failed.
pub async fn poll_until<T, F, Fut, P>(settings: PollSettings, mut probe: F, done: P) -> Option<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = E2eResult<T>>,
    P: Fn(&T) -> bool,
{
    let start = Instant::now();
    let mut last = None;
    let mut attempts = 0usize;

    loop {
        attempts += 1;
        match probe().await {
            Ok(value) => {
                if done(&value) {
                    return Some(value);
                }
                last = Some(value);
            }
            Err(e) => debug!("Poll attempt {} failed: {}", attempts, e),
        }

        if start.elapsed() >= settings.timeout {
            debug!("Polling gave up after {} attempts", attempts);
            return last;
        }
        sleep(settings.interval).await;
    }
}
