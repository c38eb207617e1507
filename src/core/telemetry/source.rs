use std::path::Path;

use super::metrics::{
    BatteryReading, CpuTimes, DiskUsage, GpuReading, MemoryReading, NetworkCounters,
    ProcessEntry, TemperatureReading,
};
use crate::error::Result;

/// Point-in-time readings of the host, one query per metric kind.
///
/// Every method is synchronous and may block (a CPU reading typically waits
/// for its integration window). Producers call these from tokio's blocking
/// pool, so an implementation is free to sleep or do file I/O.
///
/// Absent hardware is reported as a value (`Ok(None)`, an empty list), not
/// as an error. `Err` means the query failed this time and may succeed on
/// the next cycle.
pub trait MetricSource: Send + Sync {
    /// Overall CPU utilisation in percent.
    fn cpu_overall(&self) -> f32;

    /// Per-core utilisation in percent, as of the last `cpu_overall` call.
    fn cpu_per_core(&self) -> Vec<f32>;

    fn cpu_times(&self) -> Option<CpuTimes>;

    fn memory(&self) -> MemoryReading;

    fn disk_usage(&self, root: &Path) -> Result<DiskUsage>;

    fn network_counters(&self) -> NetworkCounters;

    /// `Ok(None)` on machines without a battery.
    fn battery(&self) -> Result<Option<BatteryReading>>;

    /// `Ok(None)` when no sensor driver is exposed.
    fn temperature_sensors(&self) -> Result<Option<Vec<TemperatureReading>>>;

    /// Empty when no supported GPU driver is present.
    fn gpu_list(&self) -> Result<Vec<GpuReading>>;

    /// Processes that exit mid-enumeration are left out.
    fn process_list(&self) -> Result<Vec<ProcessEntry>>;

    /// Boot time as unix seconds.
    fn boot_time(&self) -> i64;
}
