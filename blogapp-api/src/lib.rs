pub mod config;
pub mod lifecycle;
pub mod server;
pub mod telemetry;
