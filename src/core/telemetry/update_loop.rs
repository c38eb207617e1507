//! Single consumer of the event queue.
//!
//! Each tick drains at most `drain_cap` events. Every drained event updates
//! history and gauge state; only events shown on the visible view are
//! rendered and handed to the presenter.

use std::collections::HashMap;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};

use super::config::PipelineConfig;
use super::format::{
    format_bytes, format_percent, format_speed_kbps, format_temperature, format_uptime, NO_GPU,
    NO_SENSOR, NOT_AVAILABLE,
};
use super::geometry::{sparkline_points, GaugeGeometry, GaugeLayout};
use super::history::{MetricsHistory, Series};
use super::metrics::{MemorySplit, MetricEvent, MetricKind};
use super::process_snapshot::{ProcessSnapshot, TopProcesses};
use super::queue::EventReceiver;
use super::runtime::ShutdownListener;
use super::views::{GaugeId, Presenter, TextField, View, ViewUpdate, VisibilityProvider};
use crate::error::Result;

/// Last known values of one gauge.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GaugeReading {
    pub primary: f32,
    pub secondary: f32,
    /// Geometry from the last time the gauge was rendered.
    pub geometry: Option<GaugeGeometry>,
}

/// Per-gauge state, owned by the update loop.
#[derive(Debug, Clone, Default)]
pub struct GaugeState {
    readings: HashMap<GaugeId, GaugeReading>,
}

impl GaugeState {
    pub fn get(&self, gauge: GaugeId) -> Option<&GaugeReading> {
        self.readings.get(&gauge)
    }

    fn record(&mut self, gauge: GaugeId, primary: f32, secondary: f32) {
        let reading = self.readings.entry(gauge).or_default();
        reading.primary = primary;
        reading.secondary = secondary;
    }

    fn forget(&mut self, gauge: GaugeId) {
        self.readings.remove(&gauge);
    }

    /// Drop GPU gauges whose device is not in `present`.
    fn retain_gpus(&mut self, present: &[u32]) {
        self.readings.retain(|gauge, _| match gauge {
            GaugeId::Gpu(id) => present.contains(id),
            _ => true,
        });
    }

    fn set_geometry(&mut self, gauge: GaugeId, geometry: Option<GaugeGeometry>) {
        if let Some(reading) = self.readings.get_mut(&gauge) {
            reading.geometry = geometry;
        }
    }
}

/// What one tick did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub visible: Option<View>,
    pub drained: usize,
    /// Events rendered for the visible view (repaints included).
    pub rendered: usize,
    /// Events whose rendering failed; the tick carried on.
    pub failed: usize,
}

pub struct UpdateLoop {
    events: EventReceiver,
    snapshot: ProcessSnapshot,
    history: MetricsHistory,
    gauges: GaugeState,
    latest: HashMap<MetricKind, MetricEvent>,
    top_processes: Option<TopProcesses>,
    last_visible: Option<View>,
    tick_period: Duration,
    drain_cap: usize,
    top_by_cpu: usize,
    top_by_memory: usize,
    sparkline_size: (f64, f64),
    layout: GaugeLayout,
}

impl UpdateLoop {
    pub fn new(config: &PipelineConfig, events: EventReceiver, snapshot: ProcessSnapshot) -> Self {
        let capacities = config
            .metrics
            .iter()
            .map(|definition| (definition.kind, definition.window_capacity));

        Self {
            events,
            snapshot,
            history: MetricsHistory::new(capacities),
            gauges: GaugeState::default(),
            latest: HashMap::new(),
            top_processes: None,
            last_visible: None,
            tick_period: config.tick,
            drain_cap: config.drain_cap,
            top_by_cpu: config.top_by_cpu,
            top_by_memory: config.top_by_memory,
            sparkline_size: (config.sparkline_width, config.sparkline_height),
            layout: config.gauge_layout,
        }
    }

    pub fn history(&self) -> &MetricsHistory {
        &self.history
    }

    pub fn gauges(&self) -> &GaugeState {
        &self.gauges
    }

    /// Last rankings derived for the Processes view.
    pub fn top_processes(&self) -> Option<&TopProcesses> {
        self.top_processes.as_ref()
    }

    /// Events still waiting in the queue.
    pub fn pending(&self) -> usize {
        self.events.len()
    }

    /// One pass of the loop.
    pub fn tick(
        &mut self,
        visibility: &dyn VisibilityProvider,
        presenter: &mut dyn Presenter,
    ) -> TickReport {
        let visible = visibility.current_visible_view();
        let mut report = TickReport {
            visible,
            ..Default::default()
        };

        if visible != self.last_visible {
            if let Some(view) = visible {
                self.repaint(view, presenter, &mut report);
            }
            self.last_visible = visible;
        }

        while report.drained < self.drain_cap {
            let Some(event) = self.events.try_pop() else {
                break;
            };
            report.drained += 1;

            self.record(&event);
            if let Some(view) = visible.filter(|view| view.shows(event.kind())) {
                self.render_counted(view, &event, presenter, &mut report);
            }
            self.latest.insert(event.kind(), event);
        }

        report
    }

    /// Drive `tick` on a fixed period until shutdown is raised.
    pub async fn run<V, P>(mut self, visibility: V, mut presenter: P, mut shutdown: ShutdownListener)
    where
        V: VisibilityProvider,
        P: Presenter,
    {
        let mut ticker = interval(self.tick_period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let report = self.tick(&visibility, &mut presenter);
                    if report.failed > 0 {
                        log::debug!("tick: {} of {} events failed to render", report.failed, report.drained);
                    }
                }
                _ = shutdown.raised() => break,
            }
            if shutdown.is_raised() {
                break;
            }
        }
        log::debug!("update loop stopped");
    }

    /// Re-render `view` from the latest event of every kind it shows.
    fn repaint(&mut self, view: View, presenter: &mut dyn Presenter, report: &mut TickReport) {
        let kinds: Vec<MetricKind> = MetricKind::ALL
            .into_iter()
            .filter(|kind| view.shows(*kind))
            .collect();
        for kind in kinds {
            if let Some(event) = self.latest.get(&kind).cloned() {
                self.render_counted(view, &event, presenter, report);
            }
        }
    }

    fn render_counted(
        &mut self,
        view: View,
        event: &MetricEvent,
        presenter: &mut dyn Presenter,
        report: &mut TickReport,
    ) {
        match self.render(view, event, presenter) {
            Ok(()) => report.rendered += 1,
            Err(e) => {
                report.failed += 1;
                log::warn!("Failed to render {} on {}: {}", event.kind(), view.title(), e);
            }
        }
    }

    /// Bookkeeping that happens whether or not the event is visible.
    fn record(&mut self, event: &MetricEvent) {
        match event {
            MetricEvent::Cpu(sample) => {
                self.history.push(Series::Cpu, sample.overall_percent as f64);
                self.gauges.record(
                    GaugeId::Cpu,
                    sample.overall_percent,
                    sample.system_percent.unwrap_or(0.0),
                );
                for (core, value) in sample.per_core_percent.iter().enumerate() {
                    self.gauges.record(GaugeId::Core(core), *value, 0.0);
                }
            }
            MetricEvent::Memory(sample) => {
                self.history.push(Series::Memory, sample.percent as f64);
                self.gauges
                    .record(GaugeId::Memory, sample.percent, sample.swap_share_percent);
            }
            MetricEvent::Disk(sample) => {
                self.history.push(Series::Disk, sample.percent as f64);
                self.gauges.record(GaugeId::Disk, sample.percent, 0.0);
            }
            MetricEvent::Network(sample) => {
                self.history.push(Series::Download, sample.download_kbps);
                self.history.push(Series::Upload, sample.upload_kbps);
            }
            MetricEvent::Battery(Some(sample)) => {
                self.history.push(Series::Battery, sample.percent as f64);
                self.gauges.record(GaugeId::Battery, sample.percent, 0.0);
            }
            MetricEvent::Battery(None) => self.gauges.forget(GaugeId::Battery),
            MetricEvent::Gpu(gpus) => {
                let ids: Vec<u32> = gpus.iter().map(|gpu| gpu.id).collect();
                self.gauges.retain_gpus(&ids);
                for gpu in gpus {
                    self.history.push(Series::GpuLoad(gpu.id), gpu.load_percent as f64);
                    self.gauges.record(GaugeId::Gpu(gpu.id), gpu.load_percent, 0.0);
                }
            }
            MetricEvent::ProcessesReady { count, .. } => {
                self.history.push(Series::ProcessCount, *count as f64);
            }
            MetricEvent::Temperature(Some(sample)) => {
                self.history.push(Series::Temperature, sample.celsius as f64);
            }
            MetricEvent::Temperature(None) | MetricEvent::Uptime { .. } => {}
        }
    }

    fn render(&mut self, view: View, event: &MetricEvent, presenter: &mut dyn Presenter) -> Result<()> {
        match (view, event) {
            (View::Dashboard, MetricEvent::Cpu(sample)) => {
                self.present_gauge(
                    presenter,
                    view,
                    GaugeId::Cpu,
                    sample.overall_percent,
                    sample.system_percent.unwrap_or(0.0),
                )?;
                self.present_sparkline(presenter, view, Series::Cpu)
            }
            (View::CpuCores, MetricEvent::Cpu(sample)) => {
                for (core, value) in sample.per_core_percent.iter().enumerate() {
                    self.present_gauge(presenter, view, GaugeId::Core(core), *value, 0.0)?;
                }
                Ok(())
            }
            (View::Dashboard, MetricEvent::Memory(sample)) => {
                self.present_gauge(
                    presenter,
                    view,
                    GaugeId::Memory,
                    sample.percent,
                    sample.swap_share_percent,
                )?;
                presenter.present(view, text(TextField::MemorySplit, describe_split(&sample.split)))?;
                self.present_sparkline(presenter, view, Series::Memory)
            }
            (View::SystemInfo, MetricEvent::Memory(sample)) => presenter.present(
                view,
                text(TextField::MemoryTotal, format_bytes(sample.total_bytes)),
            ),
            (View::Dashboard, MetricEvent::Disk(sample)) => {
                self.present_gauge(presenter, view, GaugeId::Disk, sample.percent, 0.0)
            }
            (View::SystemInfo, MetricEvent::Disk(sample)) => presenter.present(
                view,
                text(
                    TextField::DiskTotal,
                    format!("{} ({})", format_bytes(sample.total_bytes), sample.mount_point),
                ),
            ),
            (View::Dashboard, MetricEvent::Network(sample)) => {
                presenter.present(view, text(TextField::Download, format_speed_kbps(sample.download_kbps)))?;
                presenter.present(view, text(TextField::Upload, format_speed_kbps(sample.upload_kbps)))?;
                self.present_sparkline(presenter, view, Series::Download)
            }
            (View::Dashboard, MetricEvent::Battery(Some(sample))) => {
                self.present_gauge(presenter, view, GaugeId::Battery, sample.percent, 0.0)?;
                presenter.present(view, text(TextField::BatteryTime, sample.time_remaining.clone()))
            }
            (View::Dashboard, MetricEvent::Battery(None)) => {
                presenter.present(
                    view,
                    ViewUpdate::Gauge {
                        gauge: GaugeId::Battery,
                        label: NOT_AVAILABLE.to_string(),
                        geometry: None,
                    },
                )?;
                presenter.present(view, text(TextField::BatteryTime, NOT_AVAILABLE.to_string()))
            }
            (View::Dashboard, MetricEvent::Temperature(sample)) => {
                let value = sample
                    .as_ref()
                    .map(|s| format_temperature(s.celsius))
                    .unwrap_or_else(|| NO_SENSOR.to_string());
                presenter.present(view, text(TextField::Temperature, value))
            }
            (View::Dashboard, MetricEvent::ProcessesReady { count, .. }) => {
                presenter.present(view, text(TextField::ProcessCount, count.to_string()))
            }
            (View::Processes, MetricEvent::ProcessesReady { .. }) => {
                let top = self.snapshot.top_processes(self.top_by_cpu, self.top_by_memory);
                self.top_processes = Some(top.clone());
                presenter.present(view, ViewUpdate::Processes(top))
            }
            (View::Gpu, MetricEvent::Gpu(gpus)) => {
                if gpus.is_empty() {
                    return presenter.present(view, text(TextField::GpuStatus, NO_GPU.to_string()));
                }
                presenter.present(
                    view,
                    text(TextField::GpuStatus, format!("{} GPU(s)", gpus.len())),
                )?;
                for gpu in gpus {
                    self.present_gauge(presenter, view, GaugeId::Gpu(gpu.id), gpu.load_percent, 0.0)?;
                    let temperature = gpu
                        .temperature_celsius
                        .map(format_temperature)
                        .unwrap_or_else(|| NOT_AVAILABLE.to_string());
                    let detail = format!(
                        "{} │ {} │ {} / {}",
                        gpu.name,
                        temperature,
                        format_bytes(gpu.memory_used_bytes),
                        format_bytes(gpu.memory_total_bytes)
                    );
                    presenter.present(view, text(TextField::GpuDetail(gpu.id), detail))?;
                    self.present_sparkline(presenter, view, Series::GpuLoad(gpu.id))?;
                }
                Ok(())
            }
            (View::SystemInfo, MetricEvent::Uptime { uptime_secs }) => {
                presenter.present(view, text(TextField::Uptime, format_uptime(*uptime_secs)?))
            }
            _ => Ok(()),
        }
    }

    fn present_gauge(
        &mut self,
        presenter: &mut dyn Presenter,
        view: View,
        gauge: GaugeId,
        primary: f32,
        secondary: f32,
    ) -> Result<()> {
        let geometry = self.layout.arcs(primary as f64, secondary as f64);
        self.gauges.set_geometry(gauge, Some(geometry));
        presenter.present(
            view,
            ViewUpdate::Gauge {
                gauge,
                label: format_percent(primary),
                geometry: Some(geometry),
            },
        )
    }

    /// Presents nothing while the series has fewer than two samples.
    fn present_sparkline(&self, presenter: &mut dyn Presenter, view: View, series: Series) -> Result<()> {
        let (width, height) = self.sparkline_size;
        match sparkline_points(&self.history.values(series), width, height) {
            Some(points) => presenter.present(view, ViewUpdate::Sparkline { series, points }),
            None => Ok(()),
        }
    }
}

fn text(field: TextField, text: String) -> ViewUpdate {
    ViewUpdate::Text { field, text }
}

fn describe_split(split: &MemorySplit) -> String {
    match split {
        MemorySplit::Detailed(b) => format!(
            "App {} │ Wired {} │ Compressed {} │ Free {}",
            format_bytes(b.app_bytes),
            format_bytes(b.wired_bytes),
            format_bytes(b.compressed_bytes),
            format_bytes(b.free_bytes)
        ),
        MemorySplit::Basic {
            used_bytes,
            free_bytes,
        } => format!(
            "Used {} │ Free {}",
            format_bytes(*used_bytes),
            format_bytes(*free_bytes)
        ),
    }
}
