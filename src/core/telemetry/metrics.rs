use serde::{Deserialize, Serialize};
use std::fmt;

/// Kinds of telemetry a producer can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Cpu,
    Memory,
    Disk,
    Network,
    Battery,
    Gpu,
    ProcessesReady,
    Temperature,
    Uptime,
}

impl MetricKind {
    pub const ALL: [MetricKind; 9] = [
        MetricKind::Cpu,
        MetricKind::Memory,
        MetricKind::Disk,
        MetricKind::Network,
        MetricKind::Battery,
        MetricKind::Gpu,
        MetricKind::ProcessesReady,
        MetricKind::Temperature,
        MetricKind::Uptime,
    ];

    pub fn name(self) -> &'static str {
        match self {
            MetricKind::Cpu => "cpu",
            MetricKind::Memory => "memory",
            MetricKind::Disk => "disk",
            MetricKind::Network => "network",
            MetricKind::Battery => "battery",
            MetricKind::Gpu => "gpu",
            MetricKind::ProcessesReady => "processes",
            MetricKind::Temperature => "temperature",
            MetricKind::Uptime => "uptime",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Raw readings returned by a MetricSource
// ---------------------------------------------------------------------------

/// CPU time split, in percent of the last sampling interval.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CpuTimes {
    pub user_percent: f32,
    pub system_percent: f32,
    pub idle_percent: f32,
}

/// Platform-specific memory accounting (app / wired / compressed / free).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryBreakdown {
    pub app_bytes: u64,
    pub wired_bytes: u64,
    pub compressed_bytes: u64,
    pub free_bytes: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryReading {
    pub total_bytes: u64,
    pub used_bytes: u64,
    pub available_bytes: u64,
    pub swap_total_bytes: u64,
    pub swap_used_bytes: u64,
    pub breakdown: Option<MemoryBreakdown>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiskUsage {
    pub mount_point: String,
    pub total_bytes: u64,
    pub used_bytes: u64,
}

/// Cumulative byte counters summed over all interfaces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkCounters {
    pub bytes_sent: u64,
    pub bytes_recv: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeLeft {
    Seconds(u64),
    /// Running from mains power; the battery will not run out.
    Unlimited,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatteryReading {
    pub percent: f32,
    pub plugged: bool,
    pub time_left: TimeLeft,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureReading {
    pub sensor: String,
    pub celsius: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GpuReading {
    pub id: u32,
    pub name: String,
    pub load_percent: f32,
    pub temperature_celsius: Option<f32>,
    pub memory_total_bytes: u64,
    pub memory_used_bytes: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessEntry {
    pub pid: u32,
    pub name: String,
    pub cpu_percent: f32,
    pub memory_bytes: u64,
}

// ---------------------------------------------------------------------------
// Event payloads (values already derived by the producer)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CpuSample {
    pub overall_percent: f32,
    pub per_core_percent: Vec<f32>,
    /// Share of `overall_percent` spent in kernel mode, when measurable.
    pub system_percent: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemorySplit {
    Detailed(MemoryBreakdown),
    Basic { used_bytes: u64, free_bytes: u64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemorySample {
    pub percent: f32,
    /// Swap in use, relative to total swap.
    pub swap_percent: f32,
    /// Swap in use, relative to physical memory; the gauge's secondary arc.
    pub swap_share_percent: f32,
    pub total_bytes: u64,
    pub split: MemorySplit,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiskSample {
    pub mount_point: String,
    pub percent: f32,
    pub total_bytes: u64,
    pub used_bytes: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkSample {
    pub download_kbps: f64,
    pub upload_kbps: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatterySample {
    pub percent: f32,
    pub plugged: bool,
    pub time_remaining: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureSample {
    pub sensor: String,
    pub celsius: f32,
}

/// One message from a producer to the update loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum MetricEvent {
    Cpu(CpuSample),
    Memory(MemorySample),
    Disk(DiskSample),
    Network(NetworkSample),
    /// `None` when the machine has no battery.
    Battery(Option<BatterySample>),
    /// Empty when no supported GPU driver is present.
    Gpu(Vec<GpuReading>),
    /// The shared process snapshot was replaced.
    ProcessesReady { count: usize, generation: u64 },
    /// `None` when no temperature sensor is exposed.
    Temperature(Option<TemperatureSample>),
    Uptime { uptime_secs: i64 },
}

impl MetricEvent {
    pub fn kind(&self) -> MetricKind {
        match self {
            MetricEvent::Cpu(_) => MetricKind::Cpu,
            MetricEvent::Memory(_) => MetricKind::Memory,
            MetricEvent::Disk(_) => MetricKind::Disk,
            MetricEvent::Network(_) => MetricKind::Network,
            MetricEvent::Battery(_) => MetricKind::Battery,
            MetricEvent::Gpu(_) => MetricKind::Gpu,
            MetricEvent::ProcessesReady { .. } => MetricKind::ProcessesReady,
            MetricEvent::Temperature(_) => MetricKind::Temperature,
            MetricEvent::Uptime { .. } => MetricKind::Uptime,
        }
    }
}

/// Percentage of `part` in `total`, 0 when `total` is 0.
pub fn percent_of(part: u64, total: u64) -> f32 {
    if total > 0 {
        (part as f64 / total as f64 * 100.0) as f32
    } else {
        0.0
    }
}
