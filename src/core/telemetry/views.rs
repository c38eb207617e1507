use serde::Serialize;

use super::geometry::{GaugeGeometry, Point};
use super::history::Series;
use super::metrics::MetricKind;
use super::process_snapshot::TopProcesses;
use crate::error::Result;

/// A foregroundable screen of the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Dashboard,
    CpuCores,
    Processes,
    Gpu,
    SystemInfo,
}

impl View {
    pub const ALL: [View; 5] = [
        View::Dashboard,
        View::CpuCores,
        View::Processes,
        View::Gpu,
        View::SystemInfo,
    ];

    pub fn title(self) -> &'static str {
        match self {
            View::Dashboard => "Dashboard",
            View::CpuCores => "CPU Cores",
            View::Processes => "Processes",
            View::Gpu => "GPU",
            View::SystemInfo => "System Info",
        }
    }

    /// Whether events of `kind` are drawn on this view.
    pub fn shows(self, kind: MetricKind) -> bool {
        match self {
            View::Dashboard => matches!(
                kind,
                MetricKind::Cpu
                    | MetricKind::Memory
                    | MetricKind::Disk
                    | MetricKind::Battery
                    | MetricKind::Network
                    | MetricKind::Temperature
                    | MetricKind::ProcessesReady
            ),
            View::CpuCores => kind == MetricKind::Cpu,
            View::Processes => kind == MetricKind::ProcessesReady,
            View::Gpu => kind == MetricKind::Gpu,
            View::SystemInfo => matches!(
                kind,
                MetricKind::Uptime | MetricKind::Memory | MetricKind::Disk
            ),
        }
    }

    pub fn from_name(name: &str) -> Option<View> {
        match name.to_ascii_lowercase().as_str() {
            "dashboard" => Some(View::Dashboard),
            "cores" | "cpu-cores" => Some(View::CpuCores),
            "processes" => Some(View::Processes),
            "gpu" => Some(View::Gpu),
            "info" | "system-info" => Some(View::SystemInfo),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GaugeId {
    Cpu,
    Memory,
    Disk,
    Battery,
    Core(usize),
    Gpu(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextField {
    Download,
    Upload,
    Temperature,
    ProcessCount,
    BatteryTime,
    MemorySplit,
    MemoryTotal,
    DiskTotal,
    Uptime,
    GpuDetail(u32),
    GpuStatus,
}

/// A rendered piece of a view, handed to the presenter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewUpdate {
    /// `geometry` is `None` when the value is unavailable; draw the label only.
    Gauge {
        gauge: GaugeId,
        label: String,
        geometry: Option<GaugeGeometry>,
    },
    Sparkline {
        series: Series,
        points: Vec<Point>,
    },
    Text {
        field: TextField,
        text: String,
    },
    Processes(TopProcesses),
}

/// Which view is in the foreground, read once per tick.
pub trait VisibilityProvider {
    fn current_visible_view(&self) -> Option<View>;
}

impl VisibilityProvider for Option<View> {
    fn current_visible_view(&self) -> Option<View> {
        *self
    }
}

impl VisibilityProvider for View {
    fn current_visible_view(&self) -> Option<View> {
        Some(*self)
    }
}

/// Receives rendered updates; implemented by the presentation adapter.
pub trait Presenter {
    fn present(&mut self, view: View, update: ViewUpdate) -> Result<()>;
}
