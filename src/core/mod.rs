// Core business logic module

pub mod telemetry;
