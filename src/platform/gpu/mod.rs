//! GPU-specific platform code.
//!
//! Supports NVIDIA through NVML (`nvml` feature). Machines without a
//! supported driver simply report no GPUs.

mod nvidia;

pub use nvidia::NvidiaGpuProvider;

use crate::core::telemetry::GpuReading;
use crate::error::{Result, VitalsError};

/// Enumerates GPUs of one vendor.
pub trait GpuProvider: Send + Sync {
    fn vendor(&self) -> &'static str;

    /// Current readings for every device this provider manages.
    fn list(&self) -> Result<Vec<GpuReading>>;
}

/// Attempt to get an available GPU provider
pub fn get_gpu_provider() -> Result<Box<dyn GpuProvider>> {
    if let Ok(provider) = NvidiaGpuProvider::new() {
        return Ok(Box::new(provider));
    }

    Err(VitalsError::metric_unavailable("No supported GPU found"))
}
