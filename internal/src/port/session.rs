use crate::domain::{error::SessionSendError, status::StatusState};

/// Push channel towards one live client.
///
/// `send` must not block: a slow client reports `Lagging`, a gone one `Closed`.
/// Either error removes the session from the hub.
#[cfg_attr(test, mockall::automock)]
pub trait ClientSinkDrivenPort: Send {
    fn send(&self, state: &StatusState) -> Result<(), SessionSendError>;
}
