use std::sync::Arc;

use internal::{
    domain::{
        command::ControlCommand, connection::ConnectionState, error::PublishError, session::ClientSession,
        status::StatusState,
    },
    port::command::CommandGatewayDriverPort,
    service::{
        command_gateway::CommandGateway, fan_out_hub::FanOutHub, status_store::StatusStore,
        telemetry_service::TelemetryService,
    },
};
use log::{error, info};
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::{
    config::app_config::AppConfig,
    inbound::mqtt::MqttSession,
    outbound::{client_channel::ChannelSink, model::status_event::StatusEvent, mqtt_publisher::MqttPublisher},
};

const INBOUND_CAPACITY: usize = 64;

/// Composition root handed to the HTTP and live-client layers.
pub struct Bridge {
    store: Arc<StatusStore>,
    hub: Arc<FanOutHub<ChannelSink>>,
    gateway: CommandGateway<MqttPublisher>,
    connection: watch::Receiver<ConnectionState>,
    client_buffer: usize,
    shutdown: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
}

impl Bridge {
    /// Wires every component and spawns the broker session and the telemetry
    /// consumer. Must be called from within a tokio runtime.
    pub fn start(config: &AppConfig) -> Bridge {
        let store = Arc::new(StatusStore::new());
        let hub = Arc::new(FanOutHub::new(store.clone()));
        let (inbound_tx, inbound_rx) = mpsc::channel(INBOUND_CAPACITY);
        let (session, publisher) = MqttSession::connect(&config.broker, config.topics.telemetry.clone(), inbound_tx);
        let connection = session.state();
        let shutdown = CancellationToken::new();

        let tasks = vec![
            tokio::spawn(session.run(shutdown.clone())),
            tokio::spawn(TelemetryService::new(hub.clone()).run(inbound_rx)),
        ];
        info!(
            "Bridge started: telemetry on {}, control on {}",
            config.topics.telemetry, config.topics.control
        );

        Bridge {
            store,
            hub,
            gateway: CommandGateway::new(publisher, config.topics.control.clone()),
            connection,
            client_buffer: config.clients.buffer,
            shutdown,
            tasks,
        }
    }

    pub fn status(&self) -> String {
        self.store.get().value
    }

    pub fn snapshot(&self) -> StatusState {
        self.store.get()
    }

    pub fn connection_state(&self) -> ConnectionState {
        *self.connection.borrow()
    }

    /// Publishes the command. A failure is already logged; callers may ignore it.
    pub fn issue(&self, command: ControlCommand) -> Result<(), PublishError> {
        self.gateway.issue(command)
    }

    /// Registers a live client. The receiver yields the current snapshot first.
    pub fn connect_client(&self) -> (ClientSession, mpsc::Receiver<StatusEvent>) {
        let session = ClientSession::new();
        let (sink, updates) = ChannelSink::channel(self.client_buffer);
        // a fresh sink is open and empty, the snapshot always fits
        let _ = self.hub.register(session.clone(), sink);
        (session, updates)
    }

    pub fn disconnect_client(&self, id: &Uuid) -> Option<ClientSession> {
        self.hub.unregister(id)
    }

    pub fn client_count(&self) -> usize {
        self.hub.session_count()
    }

    /// Closes the broker session, waits for both tasks and drops every client.
    pub async fn shutdown(self) {
        info!("Shutting down bridge");
        self.shutdown.cancel();
        for result in futures::future::join_all(self.tasks).await {
            if let Err(e) = result {
                error!("Bridge task ended abnormally: {e}");
            }
        }
        let dropped = self.hub.close_all();
        info!("Bridge stopped, {dropped} client session(s) dropped");
    }
}
