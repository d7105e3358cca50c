use time::OffsetDateTime;

use crate::domain::error::DecodeError;

#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryMessage {
    pub topic: String,
    pub payload: Vec<u8>,
    pub received_at: OffsetDateTime,
}

impl TelemetryMessage {
    pub fn new(topic: String, payload: Vec<u8>, received_at: OffsetDateTime) -> Self {
        TelemetryMessage {
            topic,
            payload,
            received_at,
        }
    }

    /// Payload as text. The sensor format is opaque, only UTF-8 validity is checked.
    pub fn decode(&self) -> Result<String, DecodeError> {
        std::str::from_utf8(&self.payload)
            .map(str::to_string)
            .map_err(|e| DecodeError {
                topic: self.topic.clone(),
                reason: e.to_string(),
            })
    }
}
