use crate::error::ChannelError;
use crate::messaging::contracts::{DeadLetterRecord, StatusCheckMessage};
use std::time::Duration;

pub mod redis_delayed;
pub mod timer;

/// One redelivery handed to a consumer. `retry_count` comes off the
/// envelope (`x-retry-count`), not the payload.
#[derive(Debug, Clone)]
pub struct CheckDelivery {
    pub message: StatusCheckMessage,
    pub retry_count: u32,
    pub delivery_id: String,
}

/// Publish side of broker-native delayed redelivery: a published message
/// becomes visible to consumers only after `delay` elapses. The durable
/// implementation backs the production poll loop; the timer implementation
/// exists for tests and the simulation only.
#[async_trait::async_trait]
pub trait DelayedRedeliveryChannel: Send + Sync {
    async fn publish(
        &self,
        message: StatusCheckMessage,
        retry_count: u32,
        delay: Duration,
    ) -> Result<(), ChannelError>;

    async fn publish_dead_letter(&self, record: DeadLetterRecord) -> Result<(), ChannelError>;
}

/// Consume side. `next` returns `None` only when the channel is closed;
/// a delivery is acked only after its handler branch completes, so a
/// handler failure leaves it pending for redelivery.
#[async_trait::async_trait]
pub trait DelayedRedeliveryConsumer: Send {
    async fn next(&mut self) -> Result<Option<CheckDelivery>, ChannelError>;

    async fn ack(&mut self, delivery: &CheckDelivery) -> Result<(), ChannelError>;
}
