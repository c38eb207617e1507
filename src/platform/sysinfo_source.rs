//! `MetricSource` backed by sysinfo, the battery crate and NVML.

use parking_lot::Mutex;
use std::path::Path;
use std::thread;
use std::time::Duration;
use sysinfo::{
    Components, CpuRefreshKind, Disks, MemoryRefreshKind, Networks, ProcessRefreshKind,
    ProcessesToUpdate, RefreshKind, System,
};

use super::battery::read_battery;
use super::cpu_times::{read_jiffies, CpuJiffies};
use super::gpu::{get_gpu_provider, GpuProvider};
use crate::core::telemetry::{
    BatteryReading, CpuTimes, DiskUsage, GpuReading, MemoryReading, MetricSource,
    NetworkCounters, ProcessEntry, TemperatureReading,
};
use crate::error::{Result, VitalsError};

/// Integration window of one CPU reading.
const CPU_SAMPLE_WINDOW: Duration = Duration::from_secs(1);

/// Live readings of the local machine.
///
/// Each concern has its own lock so producers never wait on each other, and
/// no lock is held while sleeping.
pub struct SysinfoSource {
    cpu: Mutex<System>,
    cpu_jiffies: Mutex<Option<CpuJiffies>>,
    memory: Mutex<System>,
    processes: Mutex<System>,
    disks: Mutex<Disks>,
    networks: Mutex<Networks>,
    components: Mutex<Components>,
    gpu: Option<Box<dyn GpuProvider>>,
}

impl SysinfoSource {
    pub fn new() -> Self {
        let gpu = match get_gpu_provider() {
            Ok(provider) => {
                log::info!("Using {} GPU provider", provider.vendor());
                Some(provider)
            }
            Err(e) => {
                log::info!("GPU monitoring unavailable: {}", e);
                None
            }
        };

        Self {
            cpu: Mutex::new(System::new_with_specifics(
                RefreshKind::nothing().with_cpu(CpuRefreshKind::nothing().with_cpu_usage()),
            )),
            cpu_jiffies: Mutex::new(read_jiffies()),
            memory: Mutex::new(System::new_with_specifics(
                RefreshKind::nothing().with_memory(MemoryRefreshKind::everything()),
            )),
            processes: Mutex::new(System::new()),
            disks: Mutex::new(Disks::new_with_refreshed_list()),
            networks: Mutex::new(Networks::new_with_refreshed_list()),
            components: Mutex::new(Components::new_with_refreshed_list()),
            gpu,
        }
    }
}

impl Default for SysinfoSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricSource for SysinfoSource {
    fn cpu_overall(&self) -> f32 {
        self.cpu.lock().refresh_cpu_usage();
        thread::sleep(CPU_SAMPLE_WINDOW.max(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL));
        let mut system = self.cpu.lock();
        system.refresh_cpu_usage();
        system.global_cpu_usage()
    }

    fn cpu_per_core(&self) -> Vec<f32> {
        self.cpu.lock().cpus().iter().map(|cpu| cpu.cpu_usage()).collect()
    }

    fn cpu_times(&self) -> Option<CpuTimes> {
        let current = read_jiffies()?;
        let previous = self.cpu_jiffies.lock().replace(current)?;
        current.percent_since(&previous)
    }

    fn memory(&self) -> MemoryReading {
        let mut system = self.memory.lock();
        system.refresh_memory();

        MemoryReading {
            total_bytes: system.total_memory(),
            used_bytes: system.used_memory(),
            available_bytes: system.available_memory(),
            swap_total_bytes: system.total_swap(),
            swap_used_bytes: system.used_swap(),
            // sysinfo exposes no app/wired/compressed accounting
            breakdown: None,
        }
    }

    fn disk_usage(&self, root: &Path) -> Result<DiskUsage> {
        let mut disks = self.disks.lock();
        disks.refresh(true);

        // deepest mount point containing `root`
        let disk = disks
            .iter()
            .filter(|disk| root.starts_with(disk.mount_point()))
            .max_by_key(|disk| disk.mount_point().as_os_str().len())
            .ok_or_else(|| {
                VitalsError::metric_collection(format!("no disk mounted at {}", root.display()))
            })?;

        let total = disk.total_space();
        Ok(DiskUsage {
            mount_point: disk.mount_point().to_string_lossy().to_string(),
            total_bytes: total,
            used_bytes: total.saturating_sub(disk.available_space()),
        })
    }

    fn network_counters(&self) -> NetworkCounters {
        let mut networks = self.networks.lock();
        networks.refresh(true);

        networks
            .values()
            .fold(NetworkCounters::default(), |acc, data| NetworkCounters {
                bytes_sent: acc.bytes_sent + data.total_transmitted(),
                bytes_recv: acc.bytes_recv + data.total_received(),
            })
    }

    fn battery(&self) -> Result<Option<BatteryReading>> {
        read_battery()
    }

    fn temperature_sensors(&self) -> Result<Option<Vec<TemperatureReading>>> {
        let mut components = self.components.lock();
        components.refresh(true);

        let readings: Vec<_> = components
            .iter()
            .filter_map(|component| {
                component.temperature().map(|celsius| TemperatureReading {
                    sensor: component.label().to_string(),
                    celsius,
                })
            })
            .collect();

        Ok((!readings.is_empty()).then_some(readings))
    }

    fn gpu_list(&self) -> Result<Vec<GpuReading>> {
        match &self.gpu {
            Some(provider) => provider.list(),
            None => Ok(Vec::new()),
        }
    }

    fn process_list(&self) -> Result<Vec<ProcessEntry>> {
        let mut system = self.processes.lock();
        system.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing().with_cpu().with_memory(),
        );

        Ok(system
            .processes()
            .values()
            .map(|process| ProcessEntry {
                pid: process.pid().as_u32(),
                name: process.name().to_string_lossy().to_string(),
                cpu_percent: process.cpu_usage(),
                memory_bytes: process.memory(),
            })
            .collect())
    }

    fn boot_time(&self) -> i64 {
        System::boot_time() as i64
    }
}
