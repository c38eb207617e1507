use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use vitals::core::telemetry::{
    BatteryReading, Cadence, CpuTimes, DiskUsage, GpuReading, MemoryReading, MetricDefinition,
    MetricKind, MetricSource, NetworkCounters, PipelineConfig, Presenter, ProcessEntry,
    TemperatureReading, TimeLeft, View, ViewUpdate,
};
use vitals::{Result, VitalsError};

/// How a scripted reading behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    Works,
    Fails,
    Panics,
}

/// Deterministic `MetricSource` for pipeline tests.
pub struct FakeSource {
    pub battery: Behavior,
    pub gpu: Behavior,
    pub processes: Behavior,
    network_calls: AtomicUsize,
    gpu_calls: AtomicUsize,
}

impl FakeSource {
    pub fn new() -> Self {
        Self {
            battery: Behavior::Works,
            gpu: Behavior::Works,
            processes: Behavior::Works,
            network_calls: AtomicUsize::new(0),
            gpu_calls: AtomicUsize::new(0),
        }
    }

    pub fn gpu_calls(&self) -> usize {
        self.gpu_calls.load(Ordering::SeqCst)
    }

    fn act<T>(behavior: Behavior, what: &str, value: T) -> Result<T> {
        match behavior {
            Behavior::Works => Ok(value),
            Behavior::Fails => Err(VitalsError::metric_collection(format!("{} is broken", what))),
            Behavior::Panics => panic!("{} exploded", what),
        }
    }
}

impl MetricSource for FakeSource {
    fn cpu_overall(&self) -> f32 {
        42.0
    }

    fn cpu_per_core(&self) -> Vec<f32> {
        vec![10.0, 20.0, 30.0, 40.0]
    }

    fn cpu_times(&self) -> Option<CpuTimes> {
        Some(CpuTimes {
            user_percent: 30.0,
            system_percent: 12.0,
            idle_percent: 58.0,
        })
    }

    fn memory(&self) -> MemoryReading {
        MemoryReading {
            total_bytes: 8 * 1024 * 1024 * 1024,
            used_bytes: 2 * 1024 * 1024 * 1024,
            available_bytes: 6 * 1024 * 1024 * 1024,
            swap_total_bytes: 0,
            swap_used_bytes: 0,
            breakdown: None,
        }
    }

    fn disk_usage(&self, root: &Path) -> Result<DiskUsage> {
        Ok(DiskUsage {
            mount_point: root.display().to_string(),
            total_bytes: 1000,
            used_bytes: 250,
        })
    }

    fn network_counters(&self) -> NetworkCounters {
        // 1 KiB more in each direction on every call
        let calls = self.network_calls.fetch_add(1, Ordering::SeqCst) as u64;
        NetworkCounters {
            bytes_sent: calls * 1024,
            bytes_recv: calls * 1024,
        }
    }

    fn battery(&self) -> Result<Option<BatteryReading>> {
        Self::act(
            self.battery,
            "battery",
            Some(BatteryReading {
                percent: 80.0,
                plugged: false,
                time_left: TimeLeft::Seconds(7500),
            }),
        )
    }

    fn temperature_sensors(&self) -> Result<Option<Vec<TemperatureReading>>> {
        Ok(Some(vec![
            TemperatureReading {
                sensor: "acpitz".to_string(),
                celsius: 30.0,
            },
            TemperatureReading {
                sensor: "coretemp Package id 0".to_string(),
                celsius: 55.0,
            },
        ]))
    }

    fn gpu_list(&self) -> Result<Vec<GpuReading>> {
        self.gpu_calls.fetch_add(1, Ordering::SeqCst);
        Self::act(
            self.gpu,
            "gpu",
            vec![GpuReading {
                id: 0,
                name: "Fake GPU".to_string(),
                load_percent: 33.0,
                temperature_celsius: Some(60.0),
                memory_total_bytes: 4096,
                memory_used_bytes: 1024,
            }],
        )
    }

    fn process_list(&self) -> Result<Vec<ProcessEntry>> {
        let entry = |pid: u32, cpu_percent: f32, memory_bytes: u64| ProcessEntry {
            pid,
            name: format!("proc{}", pid),
            cpu_percent,
            memory_bytes,
        };
        Self::act(
            self.processes,
            "processes",
            vec![
                entry(1, 5.0, 900),
                entry(2, 50.0, 100),
                entry(3, 20.0, 500),
                entry(4, 1.0, 700),
            ],
        )
    }

    fn boot_time(&self) -> i64 {
        chrono::Utc::now().timestamp() - 3600
    }
}

/// Every producer on a short cadence.
pub fn fast_config(period: Duration) -> PipelineConfig {
    let metrics = MetricKind::ALL
        .into_iter()
        .map(|kind| match kind {
            MetricKind::Cpu => MetricDefinition {
                kind,
                cadence: Cadence::Blocking { floor: period },
                window_capacity: 30,
            },
            MetricKind::Uptime => MetricDefinition::fixed(kind, period, 0),
            _ => MetricDefinition::fixed(kind, period, 30),
        })
        .collect();

    PipelineConfig {
        tick: Duration::from_millis(10),
        disk_root: PathBuf::from("/"),
        metrics,
        ..PipelineConfig::default()
    }
}

/// Presenter that keeps everything it is given.
#[derive(Default)]
pub struct Recorder {
    pub updates: Vec<(View, ViewUpdate)>,
}

impl Presenter for Recorder {
    fn present(&mut self, view: View, update: ViewUpdate) -> Result<()> {
        self.updates.push((view, update));
        Ok(())
    }
}
