//! Disk usage sampler.

use std::path::PathBuf;

use super::Sampler;
use crate::core::telemetry::metrics::{percent_of, DiskSample, MetricEvent, MetricKind};
use crate::core::telemetry::source::MetricSource;
use crate::error::Result;

/// Usage of the filesystem mounted at `root`.
pub struct DiskSampler {
    root: PathBuf,
}

impl DiskSampler {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }
}

impl Sampler for DiskSampler {
    fn kind(&self) -> MetricKind {
        MetricKind::Disk
    }

    fn sample(&mut self, source: &dyn MetricSource) -> Result<Option<MetricEvent>> {
        let usage = source.disk_usage(&self.root)?;
        Ok(Some(MetricEvent::Disk(DiskSample {
            percent: percent_of(usage.used_bytes, usage.total_bytes),
            mount_point: usage.mount_point,
            total_bytes: usage.total_bytes,
            used_bytes: usage.used_bytes,
        })))
    }
}
