// Vitals Library - Public API

use std::fs::OpenOptions;
use std::io;
use std::path::Path;

// Re-export error types
pub mod error;
pub use error::{Result, VitalsError};

// Module declarations
pub mod commands;
pub mod core;
pub mod platform;
pub mod ui;

// Re-export commonly used types
pub use core::telemetry::{PipelineConfig, TelemetryRuntime, UpdateLoop, View};

/// Initialize logging. `RUST_LOG` overrides the default `warn` level.
///
/// Without `log_file` records go to stderr. The TUI passes a file, since
/// stderr is the terminal it draws on.
pub fn init_logging(log_file: Option<&Path>) {
    log_builder(log_file).init();
}

fn log_builder(log_file: Option<&Path>) -> env_logger::Builder {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));

    if let Some(path) = log_file {
        let target: Box<dyn io::Write + Send> =
            match OpenOptions::new().create(true).append(true).open(path) {
                Ok(file) => Box::new(file),
                // never fall back to stderr under the TUI
                Err(_) => Box::new(io::sink()),
            };
        builder.target(env_logger::Target::Pipe(target));
    }
    builder
}
