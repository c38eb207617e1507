// Platform-specific code module

pub mod battery;
pub mod cpu_times;
pub mod gpu;
mod sysinfo_source;

pub use sysinfo_source::SysinfoSource;
