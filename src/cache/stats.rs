//! Cache Statistics Module
//!
//! Tracks cache performance metrics: hits, misses, remote load outcomes,
//! accumulated load time and invalidation-driven evictions.
//!
//! Statistics are optional. The toggle is resolved once at construction
//! into one of two [`StatsRecorder`] variants, so the disabled path costs
//! a branch on an enum tag rather than scattered runtime checks, and a
//! disabled recorder still snapshots a stable all-zero shape.

use std::time::Duration;

use serde::Serialize;

// == Cache Stats ==
/// Cache performance counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Number of reads served from the cache
    pub hits: u64,
    /// Number of reads that had to go to the remote store
    pub misses: u64,
    /// Number of remote loads that completed successfully
    pub load_successes: u64,
    /// Number of remote loads that failed
    pub load_failures: u64,
    /// Total time spent waiting on remote loads, in milliseconds
    pub total_load_time_ms: u64,
    /// Number of entries removed by invalidation signals
    pub evictions: u64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no reads have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

// == Stats Recorder ==
/// Counter-updating strategy selected once at construction.
///
/// `Enabled` owns live counters; `Disabled` ignores every event and
/// snapshots as all zeros, keeping the snapshot shape stable regardless
/// of configuration.
#[derive(Debug)]
pub enum StatsRecorder {
    /// Counters are live and updated on every event.
    Enabled(CacheStats),
    /// Every event is a no-op.
    Disabled,
}

impl StatsRecorder {
    // == Constructor ==
    /// Creates a recorder for the given configuration toggle.
    pub fn new(enabled: bool) -> Self {
        if enabled {
            StatsRecorder::Enabled(CacheStats::new())
        } else {
            StatsRecorder::Disabled
        }
    }

    // == Record Hit ==
    /// Counts a read served from the cache.
    pub fn record_hit(&mut self) {
        if let StatsRecorder::Enabled(stats) = self {
            stats.hits += 1;
        }
    }

    // == Record Miss ==
    /// Counts a read that missed and went remote.
    pub fn record_miss(&mut self) {
        if let StatsRecorder::Enabled(stats) = self {
            stats.misses += 1;
        }
    }

    // == Record Load Success ==
    /// Counts a successful remote load and its elapsed time.
    pub fn record_load_success(&mut self, elapsed: Duration) {
        if let StatsRecorder::Enabled(stats) = self {
            stats.load_successes += 1;
            stats.total_load_time_ms += elapsed.as_millis() as u64;
        }
    }

    // == Record Load Failure ==
    /// Counts a failed remote load and its elapsed time.
    pub fn record_load_failure(&mut self, elapsed: Duration) {
        if let StatsRecorder::Enabled(stats) = self {
            stats.load_failures += 1;
            stats.total_load_time_ms += elapsed.as_millis() as u64;
        }
    }

    // == Record Evictions ==
    /// Adds invalidation-removed entries to the eviction counter.
    pub fn record_evictions(&mut self, removed: usize) {
        if let StatsRecorder::Enabled(stats) = self {
            stats.evictions += removed as u64;
        }
    }

    // == Snapshot ==
    /// Returns an immutable copy of the counters.
    ///
    /// A disabled recorder reports every field as zero rather than
    /// omitting anything.
    pub fn snapshot(&self) -> CacheStats {
        match self {
            StatsRecorder::Enabled(stats) => stats.clone(),
            StatsRecorder::Disabled => CacheStats::new(),
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = CacheStats::new();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.load_successes, 0);
        assert_eq!(stats.load_failures, 0);
        assert_eq!(stats.total_load_time_ms, 0);
        assert_eq!(stats.evictions, 0);
    }

    #[test]
    fn test_hit_rate_no_reads() {
        let stats = CacheStats::new();
        assert_eq!(stats.hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let mut recorder = StatsRecorder::new(true);
        recorder.record_hit();
        recorder.record_miss();
        assert_eq!(recorder.snapshot().hit_rate(), 0.5);
    }

    #[test]
    fn test_enabled_recorder_counts_events() {
        let mut recorder = StatsRecorder::new(true);

        recorder.record_hit();
        recorder.record_hit();
        recorder.record_miss();
        recorder.record_load_success(Duration::from_millis(12));
        recorder.record_load_failure(Duration::from_millis(8));
        recorder.record_evictions(3);

        let stats = recorder.snapshot();
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.load_successes, 1);
        assert_eq!(stats.load_failures, 1);
        assert_eq!(stats.total_load_time_ms, 20);
        assert_eq!(stats.evictions, 3);
    }

    #[test]
    fn test_disabled_recorder_stays_zero() {
        let mut recorder = StatsRecorder::new(false);

        recorder.record_hit();
        recorder.record_miss();
        recorder.record_load_success(Duration::from_millis(100));
        recorder.record_load_failure(Duration::from_millis(100));
        recorder.record_evictions(10);

        assert_eq!(recorder.snapshot(), CacheStats::new());
    }

    #[test]
    fn test_record_evictions_accumulates() {
        let mut recorder = StatsRecorder::new(true);
        recorder.record_evictions(2);
        recorder.record_evictions(0);
        recorder.record_evictions(5);
        assert_eq!(recorder.snapshot().evictions, 7);
    }

    #[test]
    fn test_snapshot_is_independent_copy() {
        let mut recorder = StatsRecorder::new(true);
        recorder.record_hit();

        let before = recorder.snapshot();
        recorder.record_hit();
        let after = recorder.snapshot();

        assert_eq!(before.hits, 1);
        assert_eq!(after.hits, 2);
    }

    #[test]
    fn test_stats_serialize_shape() {
        let stats = CacheStats::new();
        let json = serde_json::to_value(&stats).unwrap();

        for field in [
            "hits",
            "misses",
            "load_successes",
            "load_failures",
            "total_load_time_ms",
            "evictions",
        ] {
            assert_eq!(json[field], 0, "field {} should serialize as zero", field);
        }
    }
}
