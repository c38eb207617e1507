//! GPU sampler.

use super::Sampler;
use crate::core::telemetry::metrics::{MetricEvent, MetricKind};
use crate::core::telemetry::source::MetricSource;
use crate::error::Result;

/// Emits the GPU list, possibly empty.
///
/// Repeated failures are logged once at `warn` and then at `debug` until a
/// query succeeds again.
pub struct GpuSampler {
    consecutive_failures: u32,
}

impl GpuSampler {
    pub fn new() -> Self {
        Self {
            consecutive_failures: 0,
        }
    }
}

impl Default for GpuSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl Sampler for GpuSampler {
    fn kind(&self) -> MetricKind {
        MetricKind::Gpu
    }

    fn sample(&mut self, source: &dyn MetricSource) -> Result<Option<MetricEvent>> {
        match source.gpu_list() {
            Ok(gpus) => {
                self.consecutive_failures = 0;
                Ok(Some(MetricEvent::Gpu(gpus)))
            }
            Err(e) => {
                self.consecutive_failures += 1;
                if self.consecutive_failures > 1 {
                    log::debug!(
                        "GPU query failed again (attempt {}): {}",
                        self.consecutive_failures,
                        e
                    );
                    return Ok(None);
                }
                Err(e)
            }
        }
    }
}
