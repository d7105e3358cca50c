use time::OffsetDateTime;

/// Value reported until the first telemetry message arrives.
pub const LOADING: &str = "Loading...";

#[derive(Debug, Clone, PartialEq)]
pub struct StatusState {
    pub value: String,
    pub updated_at: Option<OffsetDateTime>,
}

impl StatusState {
    pub fn loading() -> Self {
        StatusState {
            value: LOADING.to_string(),
            updated_at: None,
        }
    }
    pub fn new(value: String, updated_at: OffsetDateTime) -> Self {
        StatusState {
            value,
            updated_at: Some(updated_at),
        }
    }
    pub fn is_loading(&self) -> bool {
        self.updated_at.is_none()
    }
}

impl Default for StatusState {
    fn default() -> Self {
        Self::loading()
    }
}
