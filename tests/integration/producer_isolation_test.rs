use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use vitals::core::telemetry::tasks::spawn_producers;
use vitals::core::telemetry::{
    event_queue, EventReceiver, MetricEvent, MetricKind, MetricSource, ProcessSnapshot,
    ShutdownSignal,
};

use super::support::{fast_config, Behavior, FakeSource};

fn drain(receiver: &mut EventReceiver) -> Vec<MetricEvent> {
    let mut events = Vec::new();
    while let Some(event) = receiver.try_pop() {
        events.push(event);
    }
    events
}

fn count_by_kind(events: &[MetricEvent]) -> HashMap<MetricKind, usize> {
    let mut counts = HashMap::new();
    for event in events {
        *counts.entry(event.kind()).or_insert(0) += 1;
    }
    counts
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_failing_and_panicking_producers_do_not_stop_others() {
    let mut source = FakeSource::new();
    source.battery = Behavior::Fails;
    source.gpu = Behavior::Panics;
    let fake = Arc::new(source);
    let source: Arc<dyn MetricSource> = fake.clone();

    let config = fast_config(Duration::from_millis(20));
    let (events, mut receiver) = event_queue();
    let snapshot = ProcessSnapshot::new();
    let shutdown = ShutdownSignal::new();

    let handles = spawn_producers(
        &Handle::current(),
        &config,
        source,
        events,
        &snapshot,
        &shutdown.subscribe(),
    );
    assert_eq!(handles.len(), MetricKind::ALL.len());

    tokio::time::sleep(Duration::from_millis(300)).await;
    shutdown.raise();
    for handle in handles {
        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("producer did not stop after shutdown")
            .expect("producer task panicked");
    }

    let counts = count_by_kind(&drain(&mut receiver));
    assert!(!counts.contains_key(&MetricKind::Battery));
    assert!(!counts.contains_key(&MetricKind::Gpu));
    for kind in [
        MetricKind::Cpu,
        MetricKind::Memory,
        MetricKind::Disk,
        MetricKind::ProcessesReady,
        MetricKind::Temperature,
        MetricKind::Uptime,
    ] {
        assert!(
            counts.get(&kind).copied().unwrap_or(0) >= 2,
            "{} kept producing",
            kind
        );
    }
    // the panicking producer keeps trying on later cycles
    assert!(fake.gpu_calls() >= 2);
    // first network reading is only a baseline
    assert!(counts.get(&MetricKind::Network).copied().unwrap_or(0) >= 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_process_snapshot_published_before_event() {
    let source: Arc<dyn MetricSource> = Arc::new(FakeSource::new());
    let config = fast_config(Duration::from_millis(20));
    let (events, mut receiver) = event_queue();
    let snapshot = ProcessSnapshot::new();
    let shutdown = ShutdownSignal::new();

    let handles = spawn_producers(
        &Handle::current(),
        &config,
        source,
        events,
        &snapshot,
        &shutdown.subscribe(),
    );
    tokio::time::sleep(Duration::from_millis(150)).await;
    shutdown.raise();
    for handle in handles {
        let _ = tokio::time::timeout(Duration::from_secs(2), handle).await;
    }

    let generations: Vec<u64> = drain(&mut receiver)
        .into_iter()
        .filter_map(|event| match event {
            MetricEvent::ProcessesReady { count, generation } => {
                assert_eq!(count, 4);
                Some(generation)
            }
            _ => None,
        })
        .collect();

    assert!(!generations.is_empty());
    assert!(generations.windows(2).all(|pair| pair[0] < pair[1]));
    let last = generations.last().copied().unwrap_or(0);
    assert!(snapshot.generation() >= last);
    assert_eq!(snapshot.copy().entries.len(), 4);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_shutdown_interrupts_long_cadence() {
    let source: Arc<dyn MetricSource> = Arc::new(FakeSource::new());
    let config = fast_config(Duration::from_secs(3600));
    let (events, _receiver) = event_queue();
    let snapshot = ProcessSnapshot::new();
    let shutdown = ShutdownSignal::new();

    let handles = spawn_producers(
        &Handle::current(),
        &config,
        source,
        events,
        &snapshot,
        &shutdown.subscribe(),
    );
    tokio::time::sleep(Duration::from_millis(100)).await;
    shutdown.raise();

    for handle in handles {
        assert!(tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .is_ok());
    }
}
