use crate::broker::DelayedRedeliveryChannel;
use crate::error::ChannelError;
use crate::messaging::contracts::StatusCheckMessage;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Entry point of the poll loop: schedules the first status check for a
/// charge that dispatch left non-terminal. Invoked once per charge; the
/// scheduler re-enters by publishing new `StatusCheckMessage` instances,
/// never by calling back here.
pub struct StatusCheckRegistrar<C> {
    pub channel: Arc<C>,
    pub interval: Duration,
}

impl<C: DelayedRedeliveryChannel> StatusCheckRegistrar<C> {
    pub async fn register(
        &self,
        charge_ref: Uuid,
        payment_id: Uuid,
        amount: Decimal,
        currency: &str,
    ) -> Result<(), ChannelError> {
        tracing::info!(%charge_ref, %payment_id, "scheduling status check");

        let message = StatusCheckMessage {
            charge_ref,
            payment_id,
            amount,
            currency: currency.to_string(),
        };
        self.channel.publish(message, 1, self.interval).await
    }
}
