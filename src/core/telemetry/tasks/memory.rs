//! Memory sampler.

use super::Sampler;
use crate::core::telemetry::metrics::{
    percent_of, MemoryReading, MemorySample, MemorySplit, MetricEvent, MetricKind,
};
use crate::core::telemetry::source::MetricSource;
use crate::error::Result;

pub struct MemorySampler;

impl Sampler for MemorySampler {
    fn kind(&self) -> MetricKind {
        MetricKind::Memory
    }

    fn sample(&mut self, source: &dyn MetricSource) -> Result<Option<MetricEvent>> {
        Ok(Some(MetricEvent::Memory(summarize_memory(&source.memory()))))
    }
}

/// Usage percentages and the best available split of physical memory.
///
/// Uses the platform's app/wired/compressed/free accounting when the source
/// provides it, otherwise falls back to used/free.
pub fn summarize_memory(reading: &MemoryReading) -> MemorySample {
    let split = match reading.breakdown {
        Some(breakdown) => MemorySplit::Detailed(breakdown),
        None => MemorySplit::Basic {
            used_bytes: reading.used_bytes,
            free_bytes: reading.total_bytes.saturating_sub(reading.used_bytes),
        },
    };

    MemorySample {
        percent: percent_of(reading.used_bytes, reading.total_bytes),
        swap_percent: percent_of(reading.swap_used_bytes, reading.swap_total_bytes),
        swap_share_percent: percent_of(reading.swap_used_bytes, reading.total_bytes),
        total_bytes: reading.total_bytes,
        split,
    }
}
