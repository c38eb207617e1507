//! Uptime sampler.

use super::Sampler;
use crate::core::telemetry::metrics::{MetricEvent, MetricKind};
use crate::core::telemetry::source::MetricSource;
use crate::error::Result;

pub struct UptimeSampler;

impl Sampler for UptimeSampler {
    fn kind(&self) -> MetricKind {
        MetricKind::Uptime
    }

    fn sample(&mut self, source: &dyn MetricSource) -> Result<Option<MetricEvent>> {
        let now = chrono::Utc::now().timestamp();
        Ok(Some(MetricEvent::Uptime {
            uptime_secs: now - source.boot_time(),
        }))
    }
}
