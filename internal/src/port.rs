pub mod command;
pub mod publisher;
pub mod session;
pub mod telemetry;
