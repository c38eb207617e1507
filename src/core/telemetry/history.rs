use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::{HashMap, VecDeque};

use super::metrics::MetricKind;

/// Fixed-capacity FIFO of the most recent samples (for sparklines).
///
/// A window with capacity 0 keeps nothing.
#[derive(Debug, Clone)]
pub struct RollingWindow<T> {
    capacity: usize,
    samples: VecDeque<T>,
}

impl<T: Clone> RollingWindow<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            samples: VecDeque::with_capacity(capacity),
        }
    }

    /// Append a sample, evicting the oldest one when full.
    pub fn push(&mut self, value: T) {
        if self.capacity == 0 {
            return;
        }
        if self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(value);
    }

    /// Ordered copy, oldest first.
    pub fn snapshot(&self) -> Vec<T> {
        self.samples.iter().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.samples.iter()
    }

    pub fn latest(&self) -> Option<&T> {
        self.samples.back()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// One trend line kept by the update loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Series {
    Cpu,
    Memory,
    Disk,
    Download,
    Upload,
    Battery,
    Temperature,
    ProcessCount,
    GpuLoad(u32),
}

impl Series {
    /// The metric whose events feed this series.
    pub fn kind(self) -> MetricKind {
        match self {
            Series::Cpu => MetricKind::Cpu,
            Series::Memory => MetricKind::Memory,
            Series::Disk => MetricKind::Disk,
            Series::Download | Series::Upload => MetricKind::Network,
            Series::Battery => MetricKind::Battery,
            Series::Temperature => MetricKind::Temperature,
            Series::ProcessCount => MetricKind::ProcessesReady,
            Series::GpuLoad(_) => MetricKind::Gpu,
        }
    }
}

/// All history windows, keyed by series.
///
/// Windows are created on first push with the capacity configured for the
/// series' metric kind.
#[derive(Debug, Clone, Default)]
pub struct MetricsHistory {
    capacities: HashMap<MetricKind, usize>,
    windows: HashMap<Series, RollingWindow<f64>>,
}

impl MetricsHistory {
    pub fn new(capacities: impl IntoIterator<Item = (MetricKind, usize)>) -> Self {
        Self {
            capacities: capacities.into_iter().collect(),
            windows: HashMap::new(),
        }
    }

    pub fn push(&mut self, series: Series, value: f64) {
        let window = match self.windows.entry(series) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let capacity = self.capacities.get(&series.kind()).copied().unwrap_or(0);
                entry.insert(RollingWindow::new(capacity))
            }
        };
        window.push(value);
    }

    pub fn window(&self, series: Series) -> Option<&RollingWindow<f64>> {
        self.windows.get(&series)
    }

    /// Snapshot of a series, empty if nothing was recorded yet.
    pub fn values(&self, series: Series) -> Vec<f64> {
        self.window(series)
            .map(RollingWindow::snapshot)
            .unwrap_or_default()
    }
}
