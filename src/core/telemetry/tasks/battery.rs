//! Battery sampler.

use super::Sampler;
use crate::core::telemetry::metrics::{
    BatteryReading, BatterySample, MetricEvent, MetricKind, TimeLeft,
};
use crate::core::telemetry::source::MetricSource;
use crate::error::Result;

/// Emits `Battery(None)` on machines without a battery.
pub struct BatterySampler;

impl Sampler for BatterySampler {
    fn kind(&self) -> MetricKind {
        MetricKind::Battery
    }

    fn sample(&mut self, source: &dyn MetricSource) -> Result<Option<MetricEvent>> {
        let reading = source.battery()?;
        Ok(Some(MetricEvent::Battery(reading.map(|r| summarize(&r)))))
    }
}

fn summarize(reading: &BatteryReading) -> BatterySample {
    BatterySample {
        percent: reading.percent.clamp(0.0, 100.0),
        plugged: reading.plugged,
        time_remaining: format_time_left(reading.time_left),
    }
}

/// Human-readable time until the battery is empty.
pub fn format_time_left(time_left: TimeLeft) -> String {
    match time_left {
        TimeLeft::Seconds(secs) => {
            let hours = secs / 3600;
            let minutes = (secs % 3600) / 60;
            format!("{}h {:02}m", hours, minutes)
        }
        TimeLeft::Unlimited => "Plugged in".to_string(),
        TimeLeft::Unknown => "Calculating...".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time_left() {
        assert_eq!(format_time_left(TimeLeft::Seconds(7_500)), "2h 05m");
        assert_eq!(format_time_left(TimeLeft::Seconds(59)), "0h 00m");
        assert_eq!(format_time_left(TimeLeft::Unlimited), "Plugged in");
        assert_eq!(format_time_left(TimeLeft::Unknown), "Calculating...");
    }

    #[test]
    fn test_summary_clamps_percent() {
        let sample = summarize(&BatteryReading {
            percent: 100.4,
            plugged: true,
            time_left: TimeLeft::Unlimited,
        });
        assert_eq!(sample.percent, 100.0);
        assert!(sample.plugged);
    }
}
