//! Plain result types shared by batch stages.

use serde::{Deserialize, Serialize};

/// Accounting for one batch stage invocation.
///
/// Item failures within a batch are isolated: they degrade the produced
/// count but never abort the batch, so a report with `failed > 0` still
/// represents a completed stage.
///
/// # Examples
///
/// ```
/// use fabula_interface::StageReport;
///
/// let mut report = StageReport::default();
/// report.record_produced();
/// report.record_failed();
/// assert_eq!(report.attempted(), 2);
/// assert!(report.is_partial());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct StageReport {
    /// Items that produced an asset
    pub produced: usize,
    /// Items whose generative call failed or returned no image data
    pub failed: usize,
    /// Items skipped before their call was made (e.g., no background available)
    pub skipped: usize,
}

impl StageReport {
    /// Count one produced item.
    pub fn record_produced(&mut self) {
        self.produced += 1;
    }

    /// Count one failed item.
    pub fn record_failed(&mut self) {
        self.failed += 1;
    }

    /// Count one skipped item.
    pub fn record_skipped(&mut self) {
        self.skipped += 1;
    }

    /// Total items attempted (produced + failed), excluding skips.
    pub fn attempted(&self) -> usize {
        self.produced + self.failed
    }

    /// True if some but not all items produced an asset.
    pub fn is_partial(&self) -> bool {
        (self.failed > 0 || self.skipped > 0) && self.produced > 0
    }
}
