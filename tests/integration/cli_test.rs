use std::time::Duration;

use vitals::commands::monitor::{command, config_from_matches};
use vitals::core::telemetry::{Cadence, MetricKind, View};

#[test]
fn test_disk_root_and_drain_cap_flags() {
    let matches = command()
        .try_get_matches_from(["vitals", "--disk-root", "/home", "--drain-cap", "5", "--view", "gpu"])
        .unwrap();
    let (config, view) = config_from_matches(&matches).unwrap();

    assert_eq!(config.disk_root, std::path::PathBuf::from("/home"));
    assert_eq!(config.drain_cap, 5);
    assert_eq!(view, View::Gpu);
}

#[test]
fn test_default_cadences() {
    let matches = command().try_get_matches_from(["vitals"]).unwrap();
    let (config, _) = config_from_matches(&matches).unwrap();

    let cadence = |kind| config.definition(kind).map(|d| d.cadence);
    assert_eq!(
        cadence(MetricKind::Cpu),
        Some(Cadence::Blocking {
            floor: Duration::from_secs(1)
        })
    );
    assert_eq!(
        cadence(MetricKind::Disk),
        Some(Cadence::Fixed(Duration::from_secs(5)))
    );
    assert_eq!(
        cadence(MetricKind::Uptime),
        Some(Cadence::Fixed(Duration::from_secs(60)))
    );
}

#[test]
fn test_rejects_non_numeric_tick() {
    assert!(command()
        .try_get_matches_from(["vitals", "--tick-ms", "fast"])
        .is_err());
}
