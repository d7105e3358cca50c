use std::sync::Arc;

use app::outbound::{client_channel::ChannelSink, model::status_event::StatusEvent};
use internal::{
    domain::{
        command::ControlCommand,
        error::PublishError,
        session::ClientSession,
        status::LOADING,
        telemetry::TelemetryMessage,
    },
    port::{command::CommandGatewayDriverPort, publisher::PublisherDrivenPort},
    service::{
        command_gateway::CommandGateway, fan_out_hub::FanOutHub, status_store::StatusStore,
        telemetry_service::TelemetryService,
    },
};
use mockall::mock;
use time::OffsetDateTime;
use tokio::sync::mpsc;

mock! {
    Publisher {}
    impl PublisherDrivenPort for Publisher {
        fn publish(&self, topic: &str, payload: &str) -> Result<(), PublishError>;
    }
}

fn telemetry(payload: &[u8]) -> TelemetryMessage {
    TelemetryMessage::new("smartcity/moisture".into(), payload.to_vec(), OffsetDateTime::now_utc())
}

fn status(value: &str) -> StatusEvent {
    StatusEvent { status: value.into() }
}

#[tokio::test]
async fn should_fan_out_telemetry_to_every_connected_client() {
    let store = Arc::new(StatusStore::new());
    let hub = Arc::new(FanOutHub::new(store.clone()));
    let mut receivers = Vec::new();
    for _ in 0..3 {
        let (sink, rx) = ChannelSink::channel(8);
        hub.register(ClientSession::new(), sink).unwrap();
        receivers.push(rx);
    }
    assert_eq!(store.get().value, LOADING);

    let (tx, rx) = mpsc::channel(8);
    let consumer = tokio::spawn(TelemetryService::new(hub.clone()).run(rx));
    tx.send(telemetry(b"42%")).await.unwrap();
    drop(tx);
    consumer.await.unwrap();

    assert_eq!(store.get().value, "42%");
    for rx in receivers.iter_mut() {
        assert_eq!(rx.recv().await.unwrap(), status(LOADING));
        assert_eq!(rx.recv().await.unwrap(), status("42%"));
        assert!(rx.try_recv().is_err());
    }

    // late client only gets the snapshot
    let (sink, mut late) = ChannelSink::channel(8);
    hub.register(ClientSession::new(), sink).unwrap();
    assert_eq!(late.recv().await.unwrap(), status("42%"));
    assert!(late.try_recv().is_err());
}

#[tokio::test]
async fn should_keep_previous_value_on_malformed_telemetry() {
    let store = Arc::new(StatusStore::new());
    let hub = Arc::new(FanOutHub::new(store.clone()));
    let (sink, mut client) = ChannelSink::channel(8);
    hub.register(ClientSession::new(), sink).unwrap();

    let (tx, rx) = mpsc::channel(8);
    let consumer = tokio::spawn(TelemetryService::new(hub).run(rx));
    tx.send(telemetry(b"35%")).await.unwrap();
    tx.send(telemetry(&[0xf0, 0x28, 0x8c, 0xbc])).await.unwrap();
    drop(tx);
    consumer.await.unwrap();

    assert_eq!(store.get().value, "35%");
    assert_eq!(client.recv().await.unwrap(), status(LOADING));
    assert_eq!(client.recv().await.unwrap(), status("35%"));
    assert!(client.try_recv().is_err());
}

#[tokio::test]
async fn should_drop_disconnected_client_without_affecting_others() {
    let store = Arc::new(StatusStore::new());
    let hub = Arc::new(FanOutHub::new(store));
    let (gone_sink, gone) = ChannelSink::channel(8);
    let (sink, mut client) = ChannelSink::channel(8);
    hub.register(ClientSession::new(), gone_sink).unwrap();
    hub.register(ClientSession::new(), sink).unwrap();
    drop(gone);

    hub.publish("50%".into(), OffsetDateTime::now_utc());
    assert_eq!(hub.session_count(), 1);
    assert_eq!(client.recv().await.unwrap(), status(LOADING));
    assert_eq!(client.recv().await.unwrap(), status("50%"));
}

#[tokio::test]
async fn should_drop_client_that_cannot_keep_up() {
    let store = Arc::new(StatusStore::new());
    let hub = Arc::new(FanOutHub::new(store.clone()));
    // room for the snapshot only
    let (slow_sink, mut slow) = ChannelSink::channel(1);
    let (sink, mut client) = ChannelSink::channel(8);
    hub.register(ClientSession::new(), slow_sink).unwrap();
    hub.register(ClientSession::new(), sink).unwrap();

    hub.publish("42%".into(), OffsetDateTime::now_utc());
    assert_eq!(hub.session_count(), 1);
    assert_eq!(client.recv().await.unwrap(), status(LOADING));
    assert_eq!(client.recv().await.unwrap(), status("42%"));

    // the slow client sees its channel end instead of a stale value
    assert_eq!(slow.recv().await.unwrap(), status(LOADING));
    assert!(slow.recv().await.is_none());

    // reconnecting brings it up to date
    let (sink, mut again) = ChannelSink::channel(1);
    hub.register(ClientSession::new(), sink).unwrap();
    assert_eq!(again.recv().await.unwrap(), status("42%"));
}

#[test]
fn should_publish_pump_off_once_on_control_topic() {
    let mut publisher = MockPublisher::new();
    publisher
        .expect_publish()
        .withf(|topic, payload| topic == "smartcity/control" && payload == "pump:off")
        .times(1)
        .returning(|_, _| Ok(()));
    let gateway = CommandGateway::new(publisher, "smartcity/control".into());
    gateway.issue(ControlCommand::PumpOff).unwrap();
}
