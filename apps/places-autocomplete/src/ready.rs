use std::future::Future;
use std::time::Duration;

use crate::error::AdapterError;

/// Shortest gap between polls; a zero interval would never reach the timeout.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReadyPolicy {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for ReadyPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(100),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Polls `probe` every `policy.interval` until it reports the vendor library
/// as loaded, giving up once `policy.timeout` has elapsed.
///
/// Intervals below [`MIN_POLL_INTERVAL`] are raised to it.
/// Dropping the returned future cancels the wait.
pub async fn wait_until_ready<P, S, F>(
    mut probe: P,
    mut sleep: S,
    policy: ReadyPolicy,
) -> Result<(), AdapterError>
where
    P: FnMut() -> bool,
    S: FnMut(Duration) -> F,
    F: Future<Output = ()>,
{
    let interval = policy.interval.max(MIN_POLL_INTERVAL);
    let mut waited = Duration::ZERO;
    loop {
        if probe() {
            return Ok(());
        }
        if waited >= policy.timeout {
            return Err(AdapterError::LibraryUnavailable(waited));
        }
        sleep(interval).await;
        waited += interval;
    }
}
