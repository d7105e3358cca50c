pub mod client_channel;
pub mod model;
pub mod mqtt_publisher;
