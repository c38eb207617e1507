//! CPU sampler.

use super::Sampler;
use crate::core::telemetry::geometry::clamp_percent;
use crate::core::telemetry::metrics::{CpuSample, MetricEvent, MetricKind};
use crate::core::telemetry::source::MetricSource;
use crate::error::Result;

/// Overall and per-core utilisation plus the kernel-time share.
///
/// `cpu_overall` blocks for the source's integration window, which paces
/// this producer at roughly 1 Hz on its own.
pub struct CpuSampler;

impl Sampler for CpuSampler {
    fn kind(&self) -> MetricKind {
        MetricKind::Cpu
    }

    fn sample(&mut self, source: &dyn MetricSource) -> Result<Option<MetricEvent>> {
        let overall = clamp(source.cpu_overall());
        let per_core_percent = source.cpu_per_core().into_iter().map(clamp).collect();
        let system_percent = source
            .cpu_times()
            .map(|times| clamp(times.system_percent).min(overall));

        Ok(Some(MetricEvent::Cpu(CpuSample {
            overall_percent: overall,
            per_core_percent,
            system_percent,
        })))
    }
}

fn clamp(value: f32) -> f32 {
    clamp_percent(value as f64) as f32
}
