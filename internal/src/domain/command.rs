use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use crate::domain::error::CommandParseError;

/// Operator action sent to the pump/servo actuator.
///
/// Commands are fire-and-forget: each maps to one fixed payload on the
/// control topic and nothing tracks which mode the actuator is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    PumpOn,
    PumpOff,
    Auto,
}

impl ControlCommand {
    pub fn payload(&self) -> &'static str {
        match self {
            ControlCommand::PumpOn => "pump:on",
            ControlCommand::PumpOff => "pump:off",
            ControlCommand::Auto => "auto",
        }
    }
    pub fn name(&self) -> &'static str {
        match self {
            ControlCommand::PumpOn => "PumpOn",
            ControlCommand::PumpOff => "PumpOff",
            ControlCommand::Auto => "Auto",
        }
    }
}

impl Display for ControlCommand {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Parses the action segment of the operator routes (`/pump/on`, `/pump/off`, `/pump/auto`).
impl FromStr for ControlCommand {
    type Err = CommandParseError;

    fn from_str(action: &str) -> Result<Self, Self::Err> {
        match action.trim().to_lowercase().as_str() {
            "on" => Ok(ControlCommand::PumpOn),
            "off" => Ok(ControlCommand::PumpOff),
            "auto" => Ok(ControlCommand::Auto),
            _ => Err(CommandParseError::UnknownAction(action.to_string())),
        }
    }
}
