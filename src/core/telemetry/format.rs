//! Text shown for values and placeholders, shared by every presenter.

use humansize::{format_size, BINARY};

use crate::error::{Result, VitalsError};

/// Shown in place of a value that the machine cannot provide.
pub const NOT_AVAILABLE: &str = "N/A";
/// Shown when no temperature sensor is exposed.
pub const NO_SENSOR: &str = "No Sensor";
/// Shown on the GPU view when no supported GPU was found.
pub const NO_GPU: &str = "No GPU detected";

/// Format a percentage as a whole number ("42%")
pub fn format_percent(value: f32) -> String {
    format!("{:.0}%", value)
}

/// Format a throughput in KB/s ("48.8 KB/s")
pub fn format_speed_kbps(kbps: f64) -> String {
    format!("{:.1} KB/s", kbps)
}

pub fn format_temperature(celsius: f32) -> String {
    format!("{:.1}°C", celsius)
}

/// Format a byte count in binary units ("1.5 GiB")
pub fn format_bytes(bytes: u64) -> String {
    format_size(bytes, BINARY)
}

/// Format an uptime as "Xd Yh Zm".
///
/// A negative duration means the boot time is in the future (clock skew or
/// a bad reading) and is rejected.
pub fn format_uptime(uptime_secs: i64) -> Result<String> {
    if uptime_secs < 0 {
        return Err(VitalsError::render(format!(
            "negative uptime: {}s",
            uptime_secs
        )));
    }
    let days = uptime_secs / 86_400;
    let hours = (uptime_secs % 86_400) / 3600;
    let minutes = (uptime_secs % 3600) / 60;
    Ok(format!("{}d {}h {}m", days, hours, minutes))
}
