//! Producers: one long-running task per metric kind.
//!
//! Each producer owns a `Sampler` and a `Cadence`. Sampling runs on tokio's
//! blocking pool so a slow or stuck query only delays its own producer.
//! A producer never returns an error: failed cycles are logged and skipped.

mod battery;
mod cpu;
mod disk;
mod gpu;
mod memory;
mod network;
mod processes;
mod temperature;
mod uptime;

pub use battery::{format_time_left, BatterySampler};
pub use cpu::CpuSampler;
pub use disk::DiskSampler;
pub use gpu::GpuSampler;
pub use memory::{summarize_memory, MemorySampler};
pub use network::{throughput_kbps, NetworkSampler};
pub use processes::ProcessSampler;
pub use temperature::{pick_cpu_sensor, TemperatureSampler};
pub use uptime::UptimeSampler;

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use super::config::{Cadence, PipelineConfig};
use super::metrics::{MetricEvent, MetricKind};
use super::process_snapshot::ProcessSnapshot;
use super::queue::EventSender;
use super::runtime::ShutdownListener;
use super::source::MetricSource;
use crate::error::Result;

/// Produces one event per call from a `MetricSource`.
///
/// `Ok(None)` means "nothing to emit this cycle"; `Err` is a transient
/// failure. Either way the producer carries on with its cadence.
pub trait Sampler: Send + 'static {
    fn kind(&self) -> MetricKind;

    fn sample(&mut self, source: &dyn MetricSource) -> Result<Option<MetricEvent>>;
}

/// Build the sampler for a metric kind.
pub fn sampler_for(
    kind: MetricKind,
    config: &PipelineConfig,
    snapshot: &ProcessSnapshot,
) -> Box<dyn Sampler> {
    match kind {
        MetricKind::Cpu => Box::new(CpuSampler),
        MetricKind::Memory => Box::new(MemorySampler),
        MetricKind::Disk => Box::new(DiskSampler::new(config.disk_root.clone())),
        MetricKind::Network => Box::new(NetworkSampler::new()),
        MetricKind::Battery => Box::new(BatterySampler),
        MetricKind::Gpu => Box::new(GpuSampler::new()),
        MetricKind::ProcessesReady => Box::new(ProcessSampler::new(snapshot.clone())),
        MetricKind::Temperature => Box::new(TemperatureSampler),
        MetricKind::Uptime => Box::new(UptimeSampler),
    }
}

/// Spawn one producer per configured metric on `handle`.
pub fn spawn_producers(
    handle: &Handle,
    config: &PipelineConfig,
    source: Arc<dyn MetricSource>,
    events: EventSender,
    snapshot: &ProcessSnapshot,
    shutdown: &ShutdownListener,
) -> Vec<JoinHandle<()>> {
    config
        .metrics
        .iter()
        .map(|definition| {
            let sampler = sampler_for(definition.kind, config, snapshot);
            handle.spawn(run_producer(
                sampler,
                definition.cadence,
                Arc::clone(&source),
                events.clone(),
                shutdown.clone(),
            ))
        })
        .collect()
}

/// A failing source stays quiet after the first skip of a streak.
fn skip_level(consecutive_failures: u32) -> log::Level {
    if consecutive_failures <= 1 {
        log::Level::Warn
    } else {
        log::Level::Debug
    }
}

/// Producer loop: sample, emit, wait for the next cycle, until shutdown.
pub async fn run_producer(
    mut sampler: Box<dyn Sampler>,
    cadence: Cadence,
    source: Arc<dyn MetricSource>,
    events: EventSender,
    mut shutdown: ShutdownListener,
) {
    let kind = sampler.kind();
    log::debug!("{} producer started", kind);
    let mut failures: u32 = 0;

    while !shutdown.is_raised() {
        let started = Instant::now();

        let source_for_cycle = Arc::clone(&source);
        let joined = tokio::task::spawn_blocking(move || {
            let outcome =
                panic::catch_unwind(AssertUnwindSafe(|| sampler.sample(source_for_cycle.as_ref())));
            (sampler, outcome)
        })
        .await;

        let outcome = match joined {
            Ok((returned, outcome)) => {
                sampler = returned;
                outcome
            }
            Err(e) => {
                // Only happens when the runtime is shutting down.
                log::debug!("{} producer cancelled: {}", kind, e);
                break;
            }
        };

        match outcome {
            Ok(Ok(Some(event))) => {
                failures = 0;
                if events.push(event).is_err() {
                    log::debug!("{} producer: consumer gone", kind);
                    break;
                }
            }
            Ok(Ok(None)) => failures = 0,
            Ok(Err(e)) => {
                failures = failures.saturating_add(1);
                log::log!(skip_level(failures), "{} sample skipped: {}", kind, e);
            }
            Err(_) => log::error!("{} sampler panicked, skipping this cycle", kind),
        }

        if shutdown.is_raised() {
            break;
        }

        let pause = match cadence {
            Cadence::Fixed(period) => period,
            Cadence::Blocking { floor } => floor.saturating_sub(started.elapsed()),
        };
        if pause > Duration::ZERO {
            tokio::select! {
                _ = tokio::time::sleep(pause) => {}
                _ = shutdown.raised() => break,
            }
        }
    }

    log::debug!("{} producer stopped", kind);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_skips_are_demoted() {
        assert_eq!(skip_level(1), log::Level::Warn);
        assert_eq!(skip_level(2), log::Level::Debug);
        assert_eq!(skip_level(50), log::Level::Debug);
    }
}
