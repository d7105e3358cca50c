use internal::{
    domain::{error::SessionSendError, status::StatusState},
    port::session::ClientSinkDrivenPort,
};
use tokio::sync::mpsc::{self, error::TrySendError};

use super::model::status_event::StatusEvent;

/// Bounded per-client queue read by the live-client transport.
pub struct ChannelSink {
    tx: mpsc::Sender<StatusEvent>,
}

impl ChannelSink {
    pub fn channel(buffer: usize) -> (ChannelSink, mpsc::Receiver<StatusEvent>) {
        let (tx, rx) = mpsc::channel(buffer);
        (ChannelSink { tx }, rx)
    }
}

impl ClientSinkDrivenPort for ChannelSink {
    fn send(&self, state: &StatusState) -> Result<(), SessionSendError> {
        self.tx.try_send(StatusEvent::from(state)).map_err(|e| match e {
            TrySendError::Full(_) => SessionSendError::Lagging,
            TrySendError::Closed(_) => SessionSendError::Closed,
        })
    }
}
