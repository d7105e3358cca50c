use crate::domain::{error::DecodeError, status::StatusState, telemetry::TelemetryMessage};

pub trait TelemetryDriverPort {
    fn handle(&self, message: TelemetryMessage) -> Result<StatusState, DecodeError>;
}
