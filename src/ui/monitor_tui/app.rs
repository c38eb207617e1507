use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use sysinfo::System;

use crate::core::telemetry::{
    GaugeLayout, MetricSource, PipelineConfig, TelemetryRuntime, TickReport, UpdateLoop, View,
};
use crate::platform::SysinfoSource;

use super::board::Board;
use super::event_handler::MonitorEvent;
use super::render::render_ui;

/// Static facts about the machine, shown on the system info view.
#[derive(Debug, Clone, Default)]
pub struct HostInfo {
    pub os: String,
    pub kernel: String,
    pub hostname: String,
    pub arch: &'static str,
}

impl HostInfo {
    pub fn detect() -> Self {
        Self {
            os: System::long_os_version().unwrap_or_else(|| "Unknown".to_string()),
            kernel: System::kernel_version().unwrap_or_else(|| "Unknown".to_string()),
            hostname: System::host_name().unwrap_or_else(|| "Unknown".to_string()),
            arch: std::env::consts::ARCH,
        }
    }
}

/// Monitor application state
pub struct MonitorApp {
    pub board: Board,
    pub host: HostInfo,
    pub gauge_layout: GaugeLayout,
    /// Surface the sparkline points were computed for.
    pub sparkline_size: (f64, f64),
    pub should_quit: bool,
    pub show_help: bool,
    pub selected_tab: usize,
    pub last_report: TickReport,
}

impl MonitorApp {
    pub fn new(config: &PipelineConfig, initial_view: View) -> Self {
        let selected_tab = View::ALL
            .iter()
            .position(|view| *view == initial_view)
            .unwrap_or(0);

        Self {
            board: Board::default(),
            host: HostInfo::detect(),
            gauge_layout: config.gauge_layout,
            sparkline_size: (config.sparkline_width, config.sparkline_height),
            should_quit: false,
            show_help: false,
            selected_tab,
            last_report: TickReport::default(),
        }
    }

    /// The foreground view; the update loop reads it once per tick.
    pub fn visible_view(&self) -> View {
        View::ALL[self.selected_tab]
    }

    /// Handle keyboard events
    pub fn handle_event(&mut self, event: MonitorEvent) {
        let tabs = View::ALL.len();
        match event {
            MonitorEvent::Quit => self.should_quit = true,
            MonitorEvent::ToggleHelp => self.show_help = !self.show_help,
            MonitorEvent::NextTab => self.selected_tab = (self.selected_tab + 1) % tabs,
            MonitorEvent::PrevTab => self.selected_tab = (self.selected_tab + tabs - 1) % tabs,
            MonitorEvent::SelectTab(index) if index < tabs => self.selected_tab = index,
            MonitorEvent::SelectTab(_) | MonitorEvent::None => {}
        }
    }

    /// Run one update-loop tick against the foreground view.
    pub fn update(&mut self, update_loop: &mut UpdateLoop) {
        let visible = self.visible_view();
        self.last_report = update_loop.tick(&visible, &mut self.board);
        if self.last_report.failed > 0 {
            log::debug!(
                "{} of {} events failed to render",
                self.last_report.failed,
                self.last_report.drained
            );
        }
    }
}

/// Run the monitor TUI application
pub fn run_monitor_app(config: PipelineConfig, initial_view: View) -> Result<()> {
    let source: Arc<dyn MetricSource> = Arc::new(SysinfoSource::new());
    let (runtime, mut update_loop) =
        TelemetryRuntime::start(&config, source).context("Failed to start telemetry")?;

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let mut app = MonitorApp::new(&config, initial_view);
    let result = event_loop(&mut terminal, &mut app, &mut update_loop, config.tick);

    // Restore terminal
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    runtime.shutdown();
    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut MonitorApp,
    update_loop: &mut UpdateLoop,
    tick_rate: Duration,
) -> Result<()> {
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|frame| render_ui(frame, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout).context("Event poll failed")? {
            if let Event::Key(key) = event::read().context("Event read failed")? {
                if key.kind == KeyEventKind::Press {
                    app.handle_event(MonitorEvent::from_key(key.code));
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }

        if last_tick.elapsed() >= tick_rate {
            app.update(update_loop);
            last_tick = Instant::now();
        }
    }
}
