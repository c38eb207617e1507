use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use super::geometry::GaugeLayout;
use super::metrics::MetricKind;
use crate::error::{Result, VitalsError};

/// How a producer paces itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    /// Sample, then sleep for the period.
    Fixed(Duration),
    /// The query blocks for its own integration window. Only the remainder
    /// of `floor` is slept if a sample returns early.
    Blocking { floor: Duration },
}

/// Declarative description of one producer.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricDefinition {
    pub kind: MetricKind,
    pub cadence: Cadence,
    /// History length kept for this metric's series (0 = no history).
    pub window_capacity: usize,
}

impl MetricDefinition {
    pub fn fixed(kind: MetricKind, every: Duration, window_capacity: usize) -> Self {
        Self {
            kind,
            cadence: Cadence::Fixed(every),
            window_capacity,
        }
    }
}

/// Configuration for the whole pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Update loop tick period.
    pub tick: Duration,
    /// Maximum events consumed per tick.
    pub drain_cap: usize,
    pub top_by_cpu: usize,
    pub top_by_memory: usize,
    /// Filesystem whose usage the disk producer reports.
    pub disk_root: PathBuf,
    /// Logical surface sparklines are computed for.
    pub sparkline_width: f64,
    pub sparkline_height: f64,
    pub gauge_layout: GaugeLayout,
    pub metrics: Vec<MetricDefinition>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let secs = Duration::from_secs;
        Self {
            tick: Duration::from_millis(100),
            drain_cap: 20,
            top_by_cpu: 7,
            top_by_memory: 5,
            disk_root: default_disk_root(),
            sparkline_width: 100.0,
            sparkline_height: 25.0,
            gauge_layout: GaugeLayout::default(),
            metrics: vec![
                MetricDefinition {
                    kind: MetricKind::Cpu,
                    cadence: Cadence::Blocking { floor: secs(1) },
                    window_capacity: 30,
                },
                MetricDefinition::fixed(MetricKind::Memory, secs(1), 60),
                MetricDefinition::fixed(MetricKind::Disk, secs(5), 30),
                MetricDefinition::fixed(MetricKind::Network, secs(1), 60),
                MetricDefinition::fixed(MetricKind::Battery, secs(10), 30),
                MetricDefinition::fixed(MetricKind::ProcessesReady, secs(3), 30),
                MetricDefinition::fixed(MetricKind::Gpu, secs(1), 60),
                MetricDefinition::fixed(MetricKind::Temperature, secs(5), 30),
                MetricDefinition::fixed(MetricKind::Uptime, secs(60), 0),
            ],
        }
    }
}

impl PipelineConfig {
    pub fn definition(&self, kind: MetricKind) -> Option<&MetricDefinition> {
        self.metrics.iter().find(|d| d.kind == kind)
    }

    /// Override every history length at once.
    pub fn with_window_capacity(mut self, capacity: usize) -> Self {
        for definition in &mut self.metrics {
            if definition.window_capacity > 0 {
                definition.window_capacity = capacity;
            }
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.tick.is_zero() {
            return Err(VitalsError::config("tick period must be greater than zero"));
        }
        if self.drain_cap == 0 {
            return Err(VitalsError::config("drain cap must be at least 1"));
        }

        let mut seen = HashSet::new();
        for definition in &self.metrics {
            if !seen.insert(definition.kind) {
                return Err(VitalsError::config(format!(
                    "metric '{}' is defined more than once",
                    definition.kind
                )));
            }
            if let Cadence::Fixed(period) = definition.cadence {
                if period.is_zero() {
                    return Err(VitalsError::config(format!(
                        "metric '{}' has a zero polling period",
                        definition.kind
                    )));
                }
            }
        }
        Ok(())
    }
}

fn default_disk_root() -> PathBuf {
    if cfg!(windows) {
        PathBuf::from("C:\\")
    } else {
        PathBuf::from("/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.metrics.len(), MetricKind::ALL.len());
        assert_eq!(config.drain_cap, 20);
    }

    #[test]
    fn test_rejects_zero_drain_cap() {
        let config = PipelineConfig {
            drain_cap: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(VitalsError::Config(_))));
    }

    #[test]
    fn test_rejects_zero_tick() {
        let config = PipelineConfig {
            tick: Duration::ZERO,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_duplicate_definitions() {
        let mut config = PipelineConfig::default();
        config
            .metrics
            .push(MetricDefinition::fixed(MetricKind::Disk, Duration::from_secs(1), 5));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_window_override_keeps_disabled_windows() {
        let config = PipelineConfig::default().with_window_capacity(120);
        assert_eq!(config.definition(MetricKind::Cpu).unwrap().window_capacity, 120);
        assert_eq!(config.definition(MetricKind::Uptime).unwrap().window_capacity, 0);
    }
}
