use std::time::Duration;

use internal::domain::{connection::ConnectionState, error::ConnectError, telemetry::TelemetryMessage};
use log::{debug, error, info, warn};
use rumqttc::{AsyncClient, ClientError, ConnectionError, Event, EventLoop, Outgoing, Packet, Publish, QoS};
use time::OffsetDateTime;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;

use crate::{config::mqtt_config::BrokerConfig, outbound::mqtt_publisher::MqttPublisher};

const REQUEST_CAPACITY: usize = 32;
const DISCONNECT_GRACE: Duration = Duration::from_millis(500);

/// Broker session: owns the MQTT event loop, keeps the telemetry
/// subscription alive and pushes every telemetry publish onto `inbound`.
///
/// The session holds a client handle of its own, so the event loop outlives
/// every publisher and only stops on shutdown or when the consumer is gone.
pub struct MqttSession {
    client: AsyncClient,
    event_loop: EventLoop,
    endpoint: String,
    telemetry_topic: String,
    reconnect_delay: Duration,
    inbound: mpsc::Sender<TelemetryMessage>,
    state: watch::Sender<ConnectionState>,
    /// Subscribe requests issued so far. Diagnostic only, shown in the logs.
    subscriptions: u32,
}

impl MqttSession {
    /// Builds the session and the publisher sharing its request queue.
    ///
    /// Nothing touches the network until [`MqttSession::run`] polls the event loop.
    pub fn connect(
        broker: &BrokerConfig, telemetry_topic: String, inbound: mpsc::Sender<TelemetryMessage>,
    ) -> (MqttSession, MqttPublisher) {
        let (client, mut event_loop) = AsyncClient::new(broker.options(), REQUEST_CAPACITY);
        event_loop.set_network_options(broker.network_options());
        let session = MqttSession {
            client: client.clone(),
            event_loop,
            endpoint: broker.endpoint(),
            telemetry_topic,
            reconnect_delay: broker.reconnect_delay(),
            inbound,
            state: watch::Sender::new(ConnectionState::Disconnected),
            subscriptions: 0,
        };
        (session, MqttPublisher::new(client))
    }

    pub fn state(&self) -> watch::Receiver<ConnectionState> {
        self.state.subscribe()
    }

    pub async fn run(mut self, shutdown: CancellationToken) {
        self.transition(ConnectionState::Connecting);
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                polled = self.event_loop.poll() => {
                    match polled {
                        Ok(event) => {
                            if let Some(message) = self.on_event(event) {
                                if self.inbound.send(message).await.is_err() {
                                    warn!("Telemetry consumer is gone, stopping broker session");
                                    break;
                                }
                            }
                        }
                        Err(e) => {
                            let err = connect_error(&self.endpoint, e);
                            warn!("{err}, retrying in {:?}", self.reconnect_delay);
                            self.transition(ConnectionState::Reconnecting);
                            tokio::select! {
                                _ = shutdown.cancelled() => break,
                                _ = tokio::time::sleep(self.reconnect_delay) => {}
                            }
                        }
                    }
                }
            }
        }
        self.close().await;
    }

    fn on_event(&mut self, event: Event) -> Option<TelemetryMessage> {
        match event {
            Event::Incoming(Packet::ConnAck(ack)) => {
                self.transition(ConnectionState::Connected);
                // a clean session starts without subscriptions
                if !ack.session_present {
                    if let Err(e) = self.subscribe() {
                        error!("Unable to subscribe to {}: {e}", self.telemetry_topic);
                    }
                }
                None
            }
            Event::Incoming(Packet::SubAck(ack)) => {
                debug!("Subscription acknowledged: {:?}", ack.return_codes);
                None
            }
            Event::Incoming(Packet::Publish(publish)) => self.telemetry(publish),
            Event::Incoming(Packet::Disconnect) => {
                warn!("Broker {} closed the session", self.endpoint);
                self.transition(ConnectionState::Reconnecting);
                None
            }
            _ => None,
        }
    }

    fn subscribe(&mut self) -> Result<(), ClientError> {
        self.client.try_subscribe(&self.telemetry_topic, QoS::AtMostOnce)?;
        self.subscriptions += 1;
        info!("Subscribed to {} (subscription #{})", self.telemetry_topic, self.subscriptions);
        Ok(())
    }

    fn telemetry(&self, publish: Publish) -> Option<TelemetryMessage> {
        if publish.topic != self.telemetry_topic {
            debug!("Ignoring message on {}", publish.topic);
            return None;
        }
        debug!("Telemetry received on {} ({} bytes)", publish.topic, publish.payload.len());
        Some(TelemetryMessage::new(
            publish.topic,
            publish.payload.to_vec(),
            OffsetDateTime::now_utc(),
        ))
    }

    fn transition(&self, next: ConnectionState) {
        let previous = self.state.send_replace(next);
        if previous != next {
            info!("Broker session {}: {previous} -> {next}", self.endpoint);
        }
    }

    async fn close(mut self) {
        if self.state.borrow().is_connected() {
            match self.client.try_disconnect() {
                Ok(()) => {
                    let flushed = tokio::time::timeout(DISCONNECT_GRACE, async {
                        loop {
                            match self.event_loop.poll().await {
                                Ok(Event::Outgoing(Outgoing::Disconnect)) | Err(_) => break,
                                Ok(_) => {}
                            }
                        }
                    })
                    .await;
                    if flushed.is_err() {
                        debug!("Disconnect not flushed within {DISCONNECT_GRACE:?}");
                    }
                }
                Err(e) => debug!("Unable to send disconnect: {e}"),
            }
        }
        self.transition(ConnectionState::Disconnected);
    }
}

fn connect_error(endpoint: &str, err: ConnectionError) -> ConnectError {
    match err {
        ConnectionError::ConnectionRefused(code) => ConnectError::Refused {
            endpoint: endpoint.to_string(),
            reason: format!("{code:?}"),
        },
        other => ConnectError::Unreachable {
            endpoint: endpoint.to_string(),
            reason: other.to_string(),
        },
    }
}
