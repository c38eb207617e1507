#[cfg(feature = "nvml")]
use nvml_wrapper::{enum_wrappers::device::TemperatureSensor, Nvml};

use super::GpuProvider;
use crate::core::telemetry::GpuReading;
use crate::error::{Result, VitalsError};

/// NVIDIA GPU provider using NVML
pub struct NvidiaGpuProvider {
    #[cfg(feature = "nvml")]
    nvml: Nvml,
}

impl NvidiaGpuProvider {
    /// Initialise NVML; fails when the driver library is missing or no
    /// device is present.
    pub fn new() -> Result<Self> {
        #[cfg(feature = "nvml")]
        {
            let nvml = Nvml::init().map_err(|e| {
                VitalsError::metric_unavailable(format!("Failed to init NVML: {}", e))
            })?;

            let count = nvml.device_count().map_err(|e| {
                VitalsError::metric_unavailable(format!("Failed to count GPUs: {}", e))
            })?;
            if count == 0 {
                return Err(VitalsError::metric_unavailable("NVML reports no devices"));
            }

            Ok(Self { nvml })
        }
        #[cfg(not(feature = "nvml"))]
        {
            Err(VitalsError::metric_unavailable(
                "NVIDIA GPU support not enabled",
            ))
        }
    }
}

#[cfg(feature = "nvml")]
impl NvidiaGpuProvider {
    fn read_device(&self, index: u32) -> Result<GpuReading> {
        let device = self.nvml.device_by_index(index).map_err(|e| {
            VitalsError::metric_collection(format!("GPU {} unavailable: {}", index, e))
        })?;

        let name = device
            .name()
            .unwrap_or_else(|_| "Unknown NVIDIA GPU".to_string());
        let load = device.utilization_rates().map(|u| u.gpu).unwrap_or(0);
        let memory_info = device.memory_info().map_err(|e| {
            VitalsError::metric_collection(format!("GPU {} memory info: {}", index, e))
        })?;
        let temperature = device.temperature(TemperatureSensor::Gpu).ok();

        Ok(GpuReading {
            id: index,
            name,
            load_percent: load as f32,
            temperature_celsius: temperature.map(|t| t as f32),
            memory_total_bytes: memory_info.total,
            memory_used_bytes: memory_info.used,
        })
    }
}

/// Readable devices only; one failing device does not hide the others.
#[cfg_attr(not(feature = "nvml"), allow(dead_code))]
fn keep_readable(readings: impl IntoIterator<Item = Result<GpuReading>>) -> Vec<GpuReading> {
    readings
        .into_iter()
        .filter_map(|reading| match reading {
            Ok(gpu) => Some(gpu),
            Err(e) => {
                log::debug!("Skipping GPU: {}", e);
                None
            }
        })
        .collect()
}

impl GpuProvider for NvidiaGpuProvider {
    fn vendor(&self) -> &'static str {
        "NVIDIA"
    }

    fn list(&self) -> Result<Vec<GpuReading>> {
        #[cfg(feature = "nvml")]
        {
            let count = self.nvml.device_count().map_err(|e| {
                VitalsError::metric_collection(format!("Failed to count GPUs: {}", e))
            })?;
            Ok(keep_readable((0..count).map(|index| self.read_device(index))))
        }
        #[cfg(not(feature = "nvml"))]
        {
            Ok(Vec::new())
        }
    }
}
