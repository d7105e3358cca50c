use internal::domain::status::StatusState;
use serde::Serialize;

/// Event name the browser listens on.
pub const MOISTURE_UPDATE: &str = "moisture_update";

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct StatusEvent {
    pub status: String,
}

impl StatusEvent {
    pub fn name(&self) -> &'static str {
        MOISTURE_UPDATE
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl From<&StatusState> for StatusEvent {
    fn from(state: &StatusState) -> Self {
        StatusEvent {
            status: state.value.clone(),
        }
    }
}
