use std::sync::Arc;

use log::{debug, info, warn};
use tokio::sync::mpsc;

use crate::{
    domain::{error::DecodeError, status::StatusState, telemetry::TelemetryMessage},
    port::{session::ClientSinkDrivenPort, telemetry::TelemetryDriverPort},
    service::fan_out_hub::FanOutHub,
};

/// Single consumer of the broker's inbound channel, and the only path that
/// writes the status store.
pub struct TelemetryService<S: ClientSinkDrivenPort> {
    hub: Arc<FanOutHub<S>>,
}

impl<S: ClientSinkDrivenPort> TelemetryDriverPort for TelemetryService<S> {
    fn handle(&self, message: TelemetryMessage) -> Result<StatusState, DecodeError> {
        let value = message.decode()?;
        Ok(self.hub.publish(value, message.received_at))
    }
}

impl<S: ClientSinkDrivenPort> TelemetryService<S> {
    pub fn new(hub: Arc<FanOutHub<S>>) -> Self {
        TelemetryService { hub }
    }

    /// Drains `inbound` until every sender is gone.
    pub async fn run(self, mut inbound: mpsc::Receiver<TelemetryMessage>) {
        while let Some(message) = inbound.recv().await {
            match self.handle(message) {
                Ok(state) => debug!("Status updated to '{}'", state.value),
                Err(e) => warn!("Telemetry discarded: {e}"),
            }
        }
        info!("Telemetry channel closed");
    }
}
