// Counter deltas to byte rates against a moving baseline

use crate::models::{ByteCounters, RateSnapshot};
use tokio::time::Instant;

/// The last (counters, timestamp) pair a rate is computed against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleBaseline {
    pub received: u64,
    pub sent: u64,
    pub at: Instant,
}

/// What one reading did to the tracker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Observation {
    /// No usable baseline existed; this reading became the baseline.
    Primed,
    /// Elapsed time was not positive; baseline re-primed, nothing to publish.
    ClockAnomaly,
    /// A rate to publish.
    Rate(RateSnapshot),
}

#[derive(Debug, Default)]
pub struct RateTracker {
    baseline: Option<SampleBaseline>,
}

impl RateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn baseline(&self) -> Option<SampleBaseline> {
        self.baseline
    }

    /// Discard any baseline and start accumulating from this reading.
    pub fn prime(&mut self, counters: ByteCounters, at: Instant) {
        self.baseline = Some(SampleBaseline {
            received: counters.received,
            sent: counters.sent,
            at,
        });
    }

    pub fn reset(&mut self) {
        self.baseline = None;
    }

    /// Feed one reading. The baseline always advances to it.
    pub fn observe(&mut self, counters: ByteCounters, at: Instant) -> Observation {
        let Some(prev) = self.baseline else {
            self.prime(counters, at);
            return Observation::Primed;
        };
        self.prime(counters, at);

        // Instant subtraction saturates, so a clock going backwards also lands here.
        let elapsed_secs = at.saturating_duration_since(prev.at).as_secs_f64();
        if elapsed_secs <= 0.0 {
            return Observation::ClockAnomaly;
        }

        Observation::Rate(RateSnapshot {
            download_bytes_per_sec: rate(prev.received, counters.received, elapsed_secs),
            upload_bytes_per_sec: rate(prev.sent, counters.sent, elapsed_secs),
        })
    }
}

/// A counter that went backwards (reset, interface swap, wraparound) yields exactly 0.
fn rate(previous: u64, current: u64, elapsed_secs: f64) -> f64 {
    match current.checked_sub(previous) {
        Some(delta) => (delta as f64 / elapsed_secs).max(0.0),
        None => 0.0,
    }
}
