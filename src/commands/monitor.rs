//! Vitals command handler.
//!
//! Runs the telemetry pipeline either behind the TUI dashboard or as a
//! stream of JSON lines for scripting.

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use serde::Serialize;

use crate::core::telemetry::{
    MetricSource, PipelineConfig, Presenter, ShutdownSignal, TelemetryRuntime, View, ViewUpdate,
};
use crate::platform::SysinfoSource;
use crate::ui::monitor_tui::run_monitor_app;

/// Command-line interface of the `vitals` binary.
pub fn command() -> Command {
    Command::new("vitals")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Real-time system telemetry dashboard")
        .arg(
            Arg::new("tick-ms")
                .long("tick-ms")
                .value_name("MS")
                .help("Update loop period in milliseconds")
                .value_parser(value_parser!(u64))
                .default_value("100"),
        )
        .arg(
            Arg::new("drain-cap")
                .long("drain-cap")
                .value_name("N")
                .help("Maximum events rendered per tick")
                .value_parser(value_parser!(usize))
                .default_value("20"),
        )
        .arg(
            Arg::new("top-cpu")
                .long("top-cpu")
                .value_name("K")
                .help("Processes listed by CPU usage")
                .value_parser(value_parser!(usize))
                .default_value("7"),
        )
        .arg(
            Arg::new("top-memory")
                .long("top-memory")
                .value_name("K")
                .help("Processes listed by memory usage")
                .value_parser(value_parser!(usize))
                .default_value("5"),
        )
        .arg(
            Arg::new("history")
                .long("history")
                .value_name("SAMPLES")
                .help("Override every history window capacity")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("disk-root")
                .long("disk-root")
                .value_name("PATH")
                .help("Filesystem whose usage is reported")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("view")
                .long("view")
                .value_name("VIEW")
                .help("Initial view: dashboard, cores, processes, gpu, info")
                .default_value("dashboard"),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .value_name("PATH")
                .help("Where the dashboard writes its log [default: <temp dir>/vitals.log]")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print rendered updates as JSON lines instead of the TUI")
                .action(ArgAction::SetTrue),
        )
}

/// Execute the monitor command
pub fn execute(matches: &ArgMatches) -> Result<()> {
    let (config, view) = config_from_matches(matches)?;

    if matches.get_flag("json") {
        return run_json_output(config, view);
    }

    run_monitor_app(config, view).context("Failed to run system monitor")
}

/// Log destination: stderr (`None`) in JSON mode, a file under the TUI.
pub fn log_file(matches: &ArgMatches) -> Option<PathBuf> {
    if matches.get_flag("json") {
        return None;
    }
    Some(
        matches
            .get_one::<PathBuf>("log-file")
            .cloned()
            .unwrap_or_else(|| std::env::temp_dir().join("vitals.log")),
    )
}

/// Build the pipeline configuration and initial view from parsed arguments.
pub fn config_from_matches(matches: &ArgMatches) -> Result<(PipelineConfig, View)> {
    let mut config = PipelineConfig::default();

    if let Some(ms) = matches.get_one::<u64>("tick-ms") {
        config.tick = Duration::from_millis(*ms);
    }
    if let Some(cap) = matches.get_one::<usize>("drain-cap") {
        config.drain_cap = *cap;
    }
    if let Some(k) = matches.get_one::<usize>("top-cpu") {
        config.top_by_cpu = *k;
    }
    if let Some(k) = matches.get_one::<usize>("top-memory") {
        config.top_by_memory = *k;
    }
    if let Some(capacity) = matches.get_one::<usize>("history") {
        config = config.with_window_capacity(*capacity);
    }
    if let Some(root) = matches.get_one::<PathBuf>("disk-root") {
        config.disk_root = root.clone();
    }

    let name = matches
        .get_one::<String>("view")
        .map(String::as_str)
        .unwrap_or("dashboard");
    let Some(view) = View::from_name(name) else {
        bail!("Unknown view '{}'", name);
    };

    config.validate().context("Invalid configuration")?;
    Ok((config, view))
}

/// Run in JSON output mode (for scripting)
fn run_json_output(config: PipelineConfig, view: View) -> Result<()> {
    let source: Arc<dyn MetricSource> = Arc::new(SysinfoSource::new());
    let (runtime, update_loop) = TelemetryRuntime::start(&config, source)?;

    let signal = runtime.shutdown_signal().clone();
    ctrlc::set_handler(move || signal.raise()).context("Failed to install Ctrl-C handler")?;

    let listener = runtime.shutdown_signal().subscribe();
    let presenter = JsonPresenter::new(io::stdout(), runtime.shutdown_signal().clone());
    runtime.block_on(update_loop.run(view, presenter, listener));
    runtime.shutdown();
    Ok(())
}

#[derive(Serialize)]
struct JsonLine<'a> {
    view: View,
    #[serde(flatten)]
    update: &'a ViewUpdate,
}

/// Writes each update as one JSON object per line.
///
/// When the reader goes away (`vitals --json | head`), the shutdown signal
/// is raised and later updates are dropped.
pub struct JsonPresenter<W: Write> {
    out: W,
    shutdown: ShutdownSignal,
    closed: bool,
}

impl<W: Write> JsonPresenter<W> {
    pub fn new(out: W, shutdown: ShutdownSignal) -> Self {
        Self {
            out,
            shutdown,
            closed: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Presenter for JsonPresenter<W> {
    fn present(&mut self, view: View, update: ViewUpdate) -> crate::Result<()> {
        let line = serde_json::to_string(&JsonLine {
            view,
            update: &update,
        })?;
        if self.closed {
            return Ok(());
        }

        match writeln!(self.out, "{}", line).and_then(|()| self.out.flush()) {
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
                log::debug!("JSON output closed, shutting down");
                self.closed = true;
                self.shutdown.raise();
                Ok(())
            }
            result => result.map_err(Into::into),
        }
    }
}
