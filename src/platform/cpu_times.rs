//! User/system/idle split from `/proc/stat` deltas (Linux only).

use crate::core::telemetry::CpuTimes;

/// Aggregate jiffy counters from the `cpu` line of `/proc/stat`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuJiffies {
    pub user: u64,
    pub system: u64,
    pub idle: u64,
    pub total: u64,
}

impl CpuJiffies {
    /// Parse `cpu  user nice system idle iowait irq softirq steal ...`.
    pub fn parse(line: &str) -> Option<Self> {
        let mut fields = line.split_whitespace();
        if fields.next()? != "cpu" {
            return None;
        }
        let v: Vec<u64> = fields.filter_map(|x| x.parse().ok()).collect();
        if v.len() < 4 {
            return None;
        }
        let at = |i: usize| v.get(i).copied().unwrap_or(0);

        Some(Self {
            user: at(0) + at(1),
            system: at(2) + at(5) + at(6),
            idle: at(3) + at(4),
            total: v.iter().sum(),
        })
    }

    /// Percentages over the interval since `previous`; `None` if no time
    /// elapsed (or the counters went backwards).
    pub fn percent_since(&self, previous: &CpuJiffies) -> Option<CpuTimes> {
        let total = self.total.checked_sub(previous.total)?;
        if total == 0 {
            return None;
        }
        let share = |now: u64, before: u64| (now.saturating_sub(before) as f64 / total as f64 * 100.0) as f32;

        Some(CpuTimes {
            user_percent: share(self.user, previous.user),
            system_percent: share(self.system, previous.system),
            idle_percent: share(self.idle, previous.idle),
        })
    }
}

#[cfg(target_os = "linux")]
pub fn read_jiffies() -> Option<CpuJiffies> {
    let stat = std::fs::read_to_string("/proc/stat").ok()?;
    CpuJiffies::parse(stat.lines().next()?)
}

#[cfg(not(target_os = "linux"))]
pub fn read_jiffies() -> Option<CpuJiffies> {
    None
}
