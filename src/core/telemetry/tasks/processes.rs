//! Process table sampler.

use super::Sampler;
use crate::core::telemetry::metrics::{MetricEvent, MetricKind};
use crate::core::telemetry::process_snapshot::ProcessSnapshot;
use crate::core::telemetry::source::MetricSource;
use crate::error::Result;

/// Builds a fresh table, swaps it into the shared snapshot and announces it.
pub struct ProcessSampler {
    snapshot: ProcessSnapshot,
}

impl ProcessSampler {
    pub fn new(snapshot: ProcessSnapshot) -> Self {
        Self { snapshot }
    }
}

impl Sampler for ProcessSampler {
    fn kind(&self) -> MetricKind {
        MetricKind::ProcessesReady
    }

    fn sample(&mut self, source: &dyn MetricSource) -> Result<Option<MetricEvent>> {
        // Enumerate before taking the lock; only the swap is locked.
        let entries = source.process_list()?;
        let count = entries.len();
        let generation = self.snapshot.replace(entries);
        Ok(Some(MetricEvent::ProcessesReady { count, generation }))
    }
}
