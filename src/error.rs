use std::io;
use thiserror::Error;

/// Error type for the telemetry pipeline and its adapters
#[derive(Error, Debug)]
pub enum VitalsError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Metric unavailable: {0}")]
    MetricUnavailable(String),

    #[error("Metric collection failed: {0}")]
    MetricCollection(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Event queue closed")]
    QueueClosed,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for vitals
pub type Result<T> = std::result::Result<T, VitalsError>;

impl VitalsError {
    /// Create a config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        VitalsError::Config(msg.into())
    }

    pub fn metric_unavailable<S: Into<String>>(msg: S) -> Self {
        VitalsError::MetricUnavailable(msg.into())
    }

    pub fn metric_collection<S: Into<String>>(msg: S) -> Self {
        VitalsError::MetricCollection(msg.into())
    }

    pub fn render<S: Into<String>>(msg: S) -> Self {
        VitalsError::Render(msg.into())
    }
}
