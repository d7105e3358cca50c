use internal::{domain::error::PublishError, port::publisher::PublisherDrivenPort};
use rumqttc::{AsyncClient, QoS};

/// Publishes through the broker session's request queue.
///
/// Delivery is at-most-once: a request that is queued while the session is
/// reconnecting may never reach the broker.
#[derive(Clone)]
pub struct MqttPublisher {
    client: AsyncClient,
}

impl MqttPublisher {
    pub fn new(client: AsyncClient) -> Self {
        MqttPublisher { client }
    }
}

impl PublisherDrivenPort for MqttPublisher {
    fn publish(&self, topic: &str, payload: &str) -> Result<(), PublishError> {
        self.client
            .try_publish(topic, QoS::AtMostOnce, false, payload)
            .map_err(|e| PublishError::Rejected {
                topic: topic.to_string(),
                reason: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use rumqttc::MqttOptions;

    use super::*;

    #[test]
    fn should_queue_publish_without_network() {
        let (client, _event_loop) = AsyncClient::new(MqttOptions::new("test", "127.0.0.1", 1883), 4);
        let publisher = MqttPublisher::new(client);
        publisher.publish("smartcity/control", "pump:on").unwrap();
    }

    #[test]
    fn should_reject_publish_when_queue_is_full() {
        let (client, _event_loop) = AsyncClient::new(MqttOptions::new("test", "127.0.0.1", 1883), 1);
        let publisher = MqttPublisher::new(client);
        publisher.publish("smartcity/control", "pump:on").unwrap();
        let err = publisher.publish("smartcity/control", "pump:off").unwrap_err();
        assert!(matches!(err, PublishError::Rejected { topic, .. } if topic == "smartcity/control"));
    }
}
