pub mod command_gateway;
pub mod fan_out_hub;
pub mod status_store;
pub mod telemetry_service;
