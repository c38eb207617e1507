use std::sync::Arc;
use std::thread;
use std::time::Duration;

use vitals::core::telemetry::{
    GaugeId, MetricSource, Series, TelemetryRuntime, TextField, UpdateLoop, View, ViewUpdate,
};

use super::support::{fast_config, Behavior, FakeSource, Recorder};

/// Tick until the queue is empty or `rounds` ticks ran.
fn settle(update_loop: &mut UpdateLoop, view: Option<View>, recorder: &mut Recorder, rounds: usize) {
    for _ in 0..rounds {
        update_loop.tick(&view, recorder);
        if update_loop.pending() == 0 {
            break;
        }
    }
}

#[test]
fn test_dashboard_end_to_end() {
    let source: Arc<dyn MetricSource> = Arc::new(FakeSource::new());
    let (runtime, mut update_loop) =
        TelemetryRuntime::start(&fast_config(Duration::from_millis(30)), source).unwrap();

    thread::sleep(Duration::from_millis(250));
    let mut recorder = Recorder::default();
    settle(&mut update_loop, Some(View::Dashboard), &mut recorder, 50);
    runtime.shutdown();

    assert!(recorder.updates.iter().all(|(view, _)| *view == View::Dashboard));
    assert!(recorder.updates.iter().any(|(_, update)| matches!(
        update,
        ViewUpdate::Gauge { gauge: GaugeId::Cpu, label, geometry: Some(_) } if label == "42%"
    )));
    assert!(recorder.updates.iter().any(|(_, update)| matches!(
        update,
        ViewUpdate::Text { field: TextField::Temperature, text } if text == "55.0°C"
    )));
    assert!(recorder.updates.iter().any(|(_, update)| matches!(
        update,
        ViewUpdate::Text { field: TextField::BatteryTime, text } if text == "2h 05m"
    )));
    // GPU is not on the dashboard, but its history still fills
    assert!(!recorder.updates.iter().any(|(_, update)| matches!(
        update,
        ViewUpdate::Gauge { gauge: GaugeId::Gpu(_), .. }
    )));
    assert!(!update_loop.history().values(Series::GpuLoad(0)).is_empty());
    assert!(update_loop.history().values(Series::Cpu).len() >= 2);
}

#[test]
fn test_hidden_views_only_record() {
    let source: Arc<dyn MetricSource> = Arc::new(FakeSource::new());
    let (runtime, mut update_loop) =
        TelemetryRuntime::start(&fast_config(Duration::from_millis(30)), source).unwrap();

    thread::sleep(Duration::from_millis(200));
    let mut recorder = Recorder::default();
    settle(&mut update_loop, None, &mut recorder, 50);
    runtime.shutdown();

    assert!(recorder.updates.is_empty());
    assert!(!update_loop.history().values(Series::Memory).is_empty());
    assert_eq!(update_loop.gauges().get(GaugeId::Cpu).map(|g| g.primary), Some(42.0));
}

#[test]
fn test_processes_view_ranks_latest_snapshot() {
    let source: Arc<dyn MetricSource> = Arc::new(FakeSource::new());
    let mut config = fast_config(Duration::from_millis(30));
    config.top_by_cpu = 2;
    config.top_by_memory = 3;
    let (runtime, mut update_loop) = TelemetryRuntime::start(&config, source).unwrap();

    thread::sleep(Duration::from_millis(200));
    let mut recorder = Recorder::default();
    settle(&mut update_loop, Some(View::Processes), &mut recorder, 50);
    runtime.shutdown();

    let top = update_loop.top_processes().expect("processes rendered");
    assert_eq!(top.total, 4);
    let by_cpu: Vec<u32> = top.by_cpu.iter().map(|p| p.pid).collect();
    let by_memory: Vec<u32> = top.by_memory.iter().map(|p| p.pid).collect();
    assert_eq!(by_cpu, vec![2, 3]);
    assert_eq!(by_memory, vec![1, 4, 3]);
}

#[test]
fn test_gpu_view_without_gpu() {
    let mut source = FakeSource::new();
    source.gpu = Behavior::Fails;
    let source: Arc<dyn MetricSource> = Arc::new(source);
    let (runtime, mut update_loop) =
        TelemetryRuntime::start(&fast_config(Duration::from_millis(30)), source).unwrap();

    thread::sleep(Duration::from_millis(200));
    let mut recorder = Recorder::default();
    settle(&mut update_loop, Some(View::Gpu), &mut recorder, 50);
    runtime.shutdown();

    // failures are never turned into fake readings
    assert!(!recorder.updates.iter().any(|(_, update)| matches!(
        update,
        ViewUpdate::Gauge { gauge: GaugeId::Gpu(_), .. }
    )));
    assert!(update_loop.history().values(Series::GpuLoad(0)).is_empty());
}

#[test]
fn test_start_rejects_invalid_config() {
    let source: Arc<dyn MetricSource> = Arc::new(FakeSource::new());
    let mut config = fast_config(Duration::from_millis(30));
    config.drain_cap = 0;
    assert!(TelemetryRuntime::start(&config, source).is_err());
}

#[test]
fn test_board_drops_gpu_that_disappeared() {
    use vitals::core::telemetry::{event_queue, GpuReading, MetricEvent, PipelineConfig, ProcessSnapshot};
    use vitals::ui::monitor_tui::Board;

    let (events, receiver) = event_queue();
    let mut update_loop = UpdateLoop::new(&PipelineConfig::default(), receiver, ProcessSnapshot::new());
    let mut board = Board::default();

    events
        .push(MetricEvent::Gpu(vec![GpuReading {
            id: 0,
            name: "Fake GPU".to_string(),
            load_percent: 90.0,
            ..Default::default()
        }]))
        .unwrap();
    update_loop.tick(&View::Gpu, &mut board);
    assert_eq!(board.gauge(GaugeId::Gpu(0)).map(|g| g.label.as_str()), Some("90%"));

    events.push(MetricEvent::Gpu(Vec::new())).unwrap();
    update_loop.tick(&View::Gpu, &mut board);

    assert_eq!(board.gpu_ids().count(), 0);
    assert!(board.gauge(GaugeId::Gpu(0)).is_none());
    assert!(update_loop.gauges().get(GaugeId::Gpu(0)).is_none());
    assert_eq!(board.text(TextField::GpuStatus), Some("No GPU detected"));
}
