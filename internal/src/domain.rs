pub mod command;
pub mod connection;
pub mod error;
pub mod session;
pub mod status;
pub mod telemetry;
