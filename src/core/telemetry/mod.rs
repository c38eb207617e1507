//! Telemetry aggregation pipeline.
//!
//! Producers sample a `MetricSource` on their own cadence and push
//! `MetricEvent`s into an unbounded queue. A single `UpdateLoop` drains a
//! bounded number of events per tick, keeps rolling history for every
//! metric, and renders gauge/sparkline geometry only for the visible view.

mod config;
mod format;
mod geometry;
mod history;
mod metrics;
mod process_snapshot;
mod queue;
mod runtime;
mod source;
pub mod tasks;
mod update_loop;
mod views;

pub use config::{Cadence, MetricDefinition, PipelineConfig};
pub use format::{
    format_bytes, format_percent, format_speed_kbps, format_temperature, format_uptime, NO_GPU,
    NO_SENSOR, NOT_AVAILABLE,
};
pub use geometry::{
    clamp_percent, sparkline_points, ArcSegment, GaugeGeometry, GaugeLayout, Point,
    SPARKLINE_FLOOR, SPARKLINE_PADDING,
};
pub use history::{MetricsHistory, RollingWindow, Series};
pub use metrics::{
    percent_of, BatteryReading, BatterySample, CpuSample, CpuTimes, DiskSample, DiskUsage,
    GpuReading, MemoryBreakdown, MemoryReading, MemorySample, MemorySplit, MetricEvent,
    MetricKind, NetworkCounters, NetworkSample, ProcessEntry, TemperatureReading,
    TemperatureSample, TimeLeft,
};
pub use process_snapshot::{top_k_by_cpu, top_k_by_memory, ProcessSnapshot, ProcessTable, TopProcesses};
pub use queue::{event_queue, EventReceiver, EventSender};
pub use runtime::{ShutdownListener, ShutdownSignal, TelemetryRuntime};
pub use source::MetricSource;
pub use update_loop::{GaugeReading, GaugeState, TickReport, UpdateLoop};
pub use views::{GaugeId, Presenter, TextField, View, ViewUpdate, VisibilityProvider};
