use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct ClientSession {
    pub id: Uuid,
    pub connected_at: OffsetDateTime,
}

impl ClientSession {
    pub fn new() -> Self {
        ClientSession {
            id: Uuid::new_v4(),
            connected_at: OffsetDateTime::now_utc(),
        }
    }
}

impl Default for ClientSession {
    fn default() -> Self {
        Self::new()
    }
}
