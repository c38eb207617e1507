//! Battery readings through the `battery` crate.

use battery::units::ratio::percent;
use battery::units::time::second;
use battery::{Manager, State};

use crate::core::telemetry::{BatteryReading, TimeLeft};
use crate::error::{Result, VitalsError};

/// First battery of the machine, `None` on desktops without one.
pub fn read_battery() -> Result<Option<BatteryReading>> {
    let manager = Manager::new()
        .map_err(|e| VitalsError::metric_collection(format!("battery manager: {}", e)))?;
    let mut batteries = manager
        .batteries()
        .map_err(|e| VitalsError::metric_collection(format!("battery enumeration: {}", e)))?;

    let battery = match batteries.next() {
        Some(battery) => {
            battery.map_err(|e| VitalsError::metric_collection(format!("battery read: {}", e)))?
        }
        None => return Ok(None),
    };

    let plugged = matches!(battery.state(), State::Charging | State::Full);
    let time_left = match battery.time_to_empty() {
        Some(time) => TimeLeft::Seconds(time.get::<second>().max(0.0) as u64),
        None if plugged => TimeLeft::Unlimited,
        None => TimeLeft::Unknown,
    };

    Ok(Some(BatteryReading {
        percent: battery.state_of_charge().get::<percent>(),
        plugged,
        time_left,
    }))
}
