use std::fmt;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::units::format_bytes_iec;

/// Outcome of one worker iteration (write followed by read of the same file).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IterationResult {
    pub worker_id: u64,
    /// Target size chosen for this iteration, in bytes.
    pub size: u64,
    pub write_bytes: u64,
    pub read_bytes: u64,
    pub write_error: bool,
    pub read_error: bool,
    pub write_duration: Duration,
    pub read_duration: Duration,
}

impl IterationResult {
    /// Both phases succeeded and everything written was read back.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        !self.write_error && !self.read_error && self.read_bytes == self.write_bytes
    }
}

/// Running aggregate of every [`IterationResult`] folded so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Totals {
    pub operations: u64,
    /// Sum of target sizes (the expected byte count).
    pub bytes: u64,
    pub read_bytes: u64,
    pub write_bytes: u64,
    pub read_errors: u64,
    pub write_errors: u64,
    pub read_max_duration: Duration,
    pub write_max_duration: Duration,
}

impl Totals {
    pub fn update(&mut self, r: &IterationResult) {
        self.operations = self.operations.saturating_add(1);
        if r.read_error {
            self.read_errors = self.read_errors.saturating_add(1);
        }
        if r.write_error {
            self.write_errors = self.write_errors.saturating_add(1);
        }
        self.bytes = self.bytes.saturating_add(r.size);
        self.read_bytes = self.read_bytes.saturating_add(r.read_bytes);
        self.write_bytes = self.write_bytes.saturating_add(r.write_bytes);
        self.write_max_duration = self.write_max_duration.max(r.write_duration);
        self.read_max_duration = self.read_max_duration.max(r.read_duration);
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.read_errors > 0 || self.write_errors > 0
    }
}

impl fmt::Display for Totals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{operations: {}, expectedBytes: {}, readBytes: {}, writeBytes: {}, readErrors: {}, writeErrors: {}, maxReadDuration: {:?}, maxWriteDuration: {:?}}}",
            self.operations,
            format_bytes_iec(self.bytes),
            format_bytes_iec(self.read_bytes),
            format_bytes_iec(self.write_bytes),
            self.read_errors,
            self.write_errors,
            self.read_max_duration,
            self.write_max_duration,
        )
    }
}

/// Folds results until every sender is dropped, then hands the totals back.
///
/// This is the only owner of the totals while the run is in progress.
pub async fn aggregate(mut results: mpsc::Receiver<IterationResult>) -> Totals {
    let mut totals = Totals::default();
    while let Some(r) = results.recv().await {
        totals.update(&r);
    }
    tracing::debug!(operations = totals.operations, "results channel closed");
    totals
}
