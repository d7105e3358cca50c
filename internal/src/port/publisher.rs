use crate::domain::error::PublishError;

/// Outbound side of the broker session.
///
/// Implementations enqueue and return; they never wait on the network.
#[cfg_attr(test, mockall::automock)]
pub trait PublisherDrivenPort: Send + Sync {
    fn publish(&self, topic: &str, payload: &str) -> Result<(), PublishError>;
}
