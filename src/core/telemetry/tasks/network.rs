//! Network throughput sampler.

use std::time::{Duration, Instant};

use super::Sampler;
use crate::core::telemetry::metrics::{MetricEvent, MetricKind, NetworkCounters, NetworkSample};
use crate::core::telemetry::source::MetricSource;
use crate::error::Result;

/// Derives download/upload KB/s from cumulative counters.
///
/// The first cycle only records a baseline and emits nothing.
pub struct NetworkSampler {
    last: Option<(NetworkCounters, Instant)>,
}

impl NetworkSampler {
    pub fn new() -> Self {
        Self { last: None }
    }

    /// Feed one counter reading taken at `at`.
    pub fn observe(&mut self, counters: NetworkCounters, at: Instant) -> Option<NetworkSample> {
        let previous = self.last.replace((counters, at));
        let (prev, prev_at) = previous?;
        let elapsed = at.saturating_duration_since(prev_at);

        Some(NetworkSample {
            download_kbps: throughput_kbps(prev.bytes_recv, counters.bytes_recv, elapsed),
            upload_kbps: throughput_kbps(prev.bytes_sent, counters.bytes_sent, elapsed),
        })
    }
}

impl Default for NetworkSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl Sampler for NetworkSampler {
    fn kind(&self) -> MetricKind {
        MetricKind::Network
    }

    fn sample(&mut self, source: &dyn MetricSource) -> Result<Option<MetricEvent>> {
        let counters = source.network_counters();
        Ok(self
            .observe(counters, Instant::now())
            .map(MetricEvent::Network))
    }
}

/// KB/s between two cumulative byte counts.
///
/// A counter that went backwards (interface reset) yields 0, as does a zero
/// elapsed time.
pub fn throughput_kbps(previous: u64, current: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs <= 0.0 {
        return 0.0;
    }
    current.saturating_sub(previous) as f64 / 1024.0 / secs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_throughput_scenario() {
        let kbps = throughput_kbps(1_000_000, 1_050_000, Duration::from_secs(1));
        assert!((kbps - 48.828125).abs() < 1e-9);
    }

    #[test]
    fn test_counter_reset_is_zero() {
        assert_eq!(throughput_kbps(5_000, 100, Duration::from_secs(1)), 0.0);
        assert_eq!(throughput_kbps(0, 100, Duration::ZERO), 0.0);
    }

    #[test]
    fn test_first_observation_is_baseline() {
        let mut sampler = NetworkSampler::new();
        let t0 = Instant::now();
        let first = NetworkCounters {
            bytes_recv: 1_000_000,
            bytes_sent: 0,
        };
        assert!(sampler.observe(first, t0).is_none());

        let second = NetworkCounters {
            bytes_recv: 1_050_000,
            bytes_sent: 2048,
        };
        let sample = sampler.observe(second, t0 + Duration::from_secs(2)).unwrap();
        assert!((sample.download_kbps - 24.4140625).abs() < 1e-9);
        assert!((sample.upload_kbps - 1.0).abs() < 1e-9);
    }
}
