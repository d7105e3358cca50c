use crate::domain::{command::ControlCommand, error::PublishError};

pub trait CommandGatewayDriverPort {
    fn issue(&self, command: ControlCommand) -> Result<(), PublishError>;
}
