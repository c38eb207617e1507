//! Tokio runtime that hosts the producers, and the shutdown signal.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use super::config::PipelineConfig;
use super::process_snapshot::ProcessSnapshot;
use super::queue::event_queue;
use super::source::MetricSource;
use super::tasks::spawn_producers;
use super::update_loop::UpdateLoop;
use crate::error::Result;

/// How long `shutdown` waits for producers mid-sample (a CPU sample can
/// block for its whole integration window).
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// Global, cooperative shutdown flag.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    tx: Arc<watch::Sender<bool>>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    pub fn raise(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_raised(&self) -> bool {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> ShutdownListener {
        ShutdownListener {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Observer side of `ShutdownSignal`, one per task.
#[derive(Debug, Clone)]
pub struct ShutdownListener {
    rx: watch::Receiver<bool>,
}

impl ShutdownListener {
    pub fn is_raised(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once the flag is raised (or its signal is dropped).
    pub async fn raised(&mut self) {
        let _ = self.rx.wait_for(|raised| *raised).await;
    }
}

/// Background producers plus the runtime they live on.
///
/// The update loop itself is returned to the caller so it can be driven
/// from whatever thread owns the presentation state.
pub struct TelemetryRuntime {
    shutdown: ShutdownSignal,
    runtime: tokio::runtime::Runtime,
}

impl TelemetryRuntime {
    /// Validate `config`, spawn one producer per metric and return the
    /// update loop wired to them.
    pub fn start(
        config: &PipelineConfig,
        source: Arc<dyn MetricSource>,
    ) -> Result<(Self, UpdateLoop)> {
        config.validate()?;

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_time()
            .thread_name("telemetry-worker")
            .build()?;

        let (events, receiver) = event_queue();
        let snapshot = ProcessSnapshot::new();
        let shutdown = ShutdownSignal::new();

        let producers = spawn_producers(
            runtime.handle(),
            config,
            source,
            events,
            &snapshot,
            &shutdown.subscribe(),
        );
        log::info!("Started {} telemetry producers", producers.len());

        let update_loop = UpdateLoop::new(config, receiver, snapshot);
        Ok((Self { shutdown, runtime }, update_loop))
    }

    pub fn shutdown_signal(&self) -> &ShutdownSignal {
        &self.shutdown
    }

    /// Run a future (e.g. `UpdateLoop::run`) to completion on this runtime.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// Raise the shutdown flag and wait briefly for producers to finish.
    pub fn shutdown(self) {
        log::info!("Shutting down telemetry runtime");
        self.shutdown.raise();
        self.runtime.shutdown_timeout(SHUTDOWN_GRACE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_listener_observes_raise() {
        let signal = ShutdownSignal::new();
        let mut listener = signal.subscribe();
        assert!(!listener.is_raised());

        let waiter = tokio::spawn(async move {
            listener.raised().await;
            listener.is_raised()
        });
        signal.raise();
        assert!(waiter.await.unwrap());
        assert!(signal.is_raised());
    }

    #[test]
    fn test_late_subscriber_sees_raised_flag() {
        let signal = ShutdownSignal::new();
        signal.raise();
        assert!(signal.subscribe().is_raised());
    }
}
