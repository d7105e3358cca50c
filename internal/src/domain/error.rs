use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ConnectError {
    #[error("Broker {endpoint} is unreachable: {reason}")]
    Unreachable { endpoint: String, reason: String },
    #[error("Broker {endpoint} refused the connection: {reason}")]
    Refused { endpoint: String, reason: String },
}

#[derive(Error, Debug, PartialEq)]
#[error("Telemetry payload on {topic} is not valid UTF-8: {reason}")]
pub struct DecodeError {
    pub topic: String,
    pub reason: String,
}

#[derive(Error, Debug, PartialEq)]
pub enum PublishError {
    #[error("Unable to publish on {topic}: {reason}")]
    Rejected { topic: String, reason: String },
}

#[derive(Error, Debug, PartialEq)]
pub enum SessionSendError {
    #[error("Client session is closed")]
    Closed,
    #[error("Client session buffer is full")]
    Lagging,
}

#[derive(Error, Debug, PartialEq)]
pub enum CommandParseError {
    #[error("Unknown pump action: {0}")]
    UnknownAction(String),
}
