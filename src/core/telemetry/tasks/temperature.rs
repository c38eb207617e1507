//! CPU temperature sampler.

use super::Sampler;
use crate::core::telemetry::metrics::{
    MetricEvent, MetricKind, TemperatureReading, TemperatureSample,
};
use crate::core::telemetry::source::MetricSource;
use crate::error::Result;

/// Sensor labels that identify the CPU package, in order of preference.
const CPU_SENSOR_HINTS: &[&str] = &["coretemp", "cpu_thermal", "k10temp", "package", "tctl", "cpu"];

/// Emits `Temperature(None)` when no sensor is exposed.
pub struct TemperatureSampler;

impl Sampler for TemperatureSampler {
    fn kind(&self) -> MetricKind {
        MetricKind::Temperature
    }

    fn sample(&mut self, source: &dyn MetricSource) -> Result<Option<MetricEvent>> {
        let sensors = source.temperature_sensors()?.unwrap_or_default();
        let sample = pick_cpu_sensor(&sensors).map(|reading| TemperatureSample {
            sensor: reading.sensor.clone(),
            celsius: reading.celsius,
        });
        Ok(Some(MetricEvent::Temperature(sample)))
    }
}

/// The most CPU-like sensor, or the first one if none matches.
pub fn pick_cpu_sensor(sensors: &[TemperatureReading]) -> Option<&TemperatureReading> {
    CPU_SENSOR_HINTS
        .iter()
        .find_map(|hint| {
            sensors
                .iter()
                .find(|s| s.sensor.to_ascii_lowercase().contains(hint))
        })
        .or_else(|| sensors.first())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(sensor: &str, celsius: f32) -> TemperatureReading {
        TemperatureReading {
            sensor: sensor.to_string(),
            celsius,
        }
    }

    #[test]
    fn test_prefers_coretemp() {
        let sensors = vec![
            reading("nvme Composite", 40.0),
            reading("cpu_thermal", 55.0),
            reading("coretemp Package id 0", 61.0),
        ];
        assert_eq!(pick_cpu_sensor(&sensors).unwrap().celsius, 61.0);
    }

    #[test]
    fn test_falls_back_to_first_sensor() {
        let sensors = vec![reading("acpitz", 30.0), reading("nvme", 41.0)];
        assert_eq!(pick_cpu_sensor(&sensors).unwrap().sensor, "acpitz");
        assert!(pick_cpu_sensor(&[]).is_none());
    }
}
