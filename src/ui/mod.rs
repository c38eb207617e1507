// UI module

pub mod monitor_tui;
