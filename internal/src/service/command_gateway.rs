use log::{error, info};

use crate::{
    domain::{command::ControlCommand, error::PublishError},
    port::{command::CommandGatewayDriverPort, publisher::PublisherDrivenPort},
};

pub struct CommandGateway<P: PublisherDrivenPort> {
    publisher: P,
    control_topic: String,
}

impl<P: PublisherDrivenPort> CommandGatewayDriverPort for CommandGateway<P> {
    fn issue(&self, command: ControlCommand) -> Result<(), PublishError> {
        self.publisher
            .publish(&self.control_topic, command.payload())
            .inspect(|_| info!("{command} sent as '{}' on {}", command.payload(), self.control_topic))
            .inspect_err(|e| error!("{command} not sent: {e}"))
    }
}

impl<P: PublisherDrivenPort> CommandGateway<P> {
    pub fn new(publisher: P, control_topic: String) -> Self {
        CommandGateway {
            publisher,
            control_topic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::publisher::MockPublisherDrivenPort;

    fn gateway_expecting(payload: &'static str, times: usize) -> CommandGateway<MockPublisherDrivenPort> {
        let mut publisher = MockPublisherDrivenPort::new();
        publisher
            .expect_publish()
            .withf(move |topic, sent| topic == "smartcity/control" && sent == payload)
            .times(times)
            .returning(|_, _| Ok(()));
        CommandGateway::new(publisher, "smartcity/control".into())
    }

    #[test]
    fn should_publish_pump_on() {
        gateway_expecting("pump:on", 1).issue(ControlCommand::PumpOn).unwrap();
    }

    #[test]
    fn should_publish_pump_off() {
        gateway_expecting("pump:off", 1).issue(ControlCommand::PumpOff).unwrap();
    }

    #[test]
    fn should_publish_auto() {
        gateway_expecting("auto", 1).issue(ControlCommand::Auto).unwrap();
    }

    #[test]
    fn should_publish_repeated_command_every_time() {
        let gateway = gateway_expecting("pump:on", 2);
        gateway.issue(ControlCommand::PumpOn).unwrap();
        gateway.issue(ControlCommand::PumpOn).unwrap();
    }

    #[test]
    fn should_return_publish_error() {
        let mut publisher = MockPublisherDrivenPort::new();
        publisher.expect_publish().times(1).returning(|topic, _| {
            Err(PublishError::Rejected {
                topic: topic.to_string(),
                reason: "queue full".into(),
            })
        });
        let gateway = CommandGateway::new(publisher, "smartcity/control".into());
        let err = gateway.issue(ControlCommand::PumpOff).unwrap_err();
        assert!(matches!(err, PublishError::Rejected { .. }));
    }
}
