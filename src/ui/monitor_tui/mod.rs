//! Terminal User Interface for the vitals dashboard.
//!
//! The update loop renders into a [`Board`]; the draw pass reads the board
//! for the foreground view only.

mod app;
mod board;
mod event_handler;
mod render;
mod widgets;

pub use app::{run_monitor_app, HostInfo, MonitorApp};
pub use board::{Board, GaugeView};
pub use event_handler::MonitorEvent;
