//! Inter-item pacing for batch stages.

use std::time::Duration;

/// Applies a fixed delay between consecutive batch items.
///
/// Image-generation quotas are enforced per request, so batch stages pause
/// between items rather than issuing calls back to back. A zero interval
/// disables pausing entirely, which is how tests run without sleeping.
///
/// # Examples
///
/// ```
/// use fabula_pipeline::Pacer;
///
/// let pacer = Pacer::from_millis(0);
/// assert!(pacer.is_disabled());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacer {
    interval: Duration,
}

impl Pacer {
    /// Create a pacer with the given inter-item interval.
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// Create a pacer from an interval in milliseconds.
    pub fn from_millis(millis: u64) -> Self {
        Self::new(Duration::from_millis(millis))
    }

    /// The configured inter-item interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// True when the interval is zero and `pause` returns immediately.
    pub fn is_disabled(&self) -> bool {
        self.interval.is_zero()
    }

    /// Wait out one inter-item interval.
    pub async fn pause(&self) {
        if !self.interval.is_zero() {
            tokio::time::sleep(self.interval).await;
        }
    }
}

impl Default for Pacer {
    /// One second between items.
    fn default() -> Self {
        Self::from_millis(1000)
    }
}
