use crate::broker::{CheckDelivery, DelayedRedeliveryChannel, DelayedRedeliveryConsumer};
use crate::checkstate::handler::StatusCheckHandler;
use crate::error::AdapterError;
use crate::gateways::ChargeGateway;
use crate::messaging::contracts::{
    ChargeResponseMessage, DeadLetterRecord, FinalStatus, StatusCheckMessage,
};
use crate::messaging::AsyncSender;
use std::sync::Arc;
use std::time::Duration;

/// Drives the per-check state machine on each redelivery: resolve, reschedule
/// with an incremented retry count, or escalate to the dead-letter channel
/// with a distinguishable reason.
pub struct StatusCheckListener<G, S, C> {
    pub handler: StatusCheckHandler<G, S>,
    pub channel: Arc<C>,
    pub max_retries: u32,
    pub interval: Duration,
    pub queue_name: String,
}

impl<G, S, C> StatusCheckListener<G, S, C>
where
    G: ChargeGateway,
    S: AsyncSender<ChargeResponseMessage>,
    C: DelayedRedeliveryChannel,
{
    pub async fn on_delivery(&self, delivery: &CheckDelivery) -> Result<(), AdapterError> {
        let retry_count = delivery.retry_count;
        let message = &delivery.message;
        tracing::info!(
            retry = retry_count,
            payment_id = %message.payment_id,
            amount = %message.amount,
            currency = %message.currency,
            "checking payment status"
        );

        match self.handler.handle(message.charge_ref).await {
            Ok(true) => Ok(()),
            Ok(false) if retry_count < self.max_retries => {
                // A fresh message, never a mutation of the delivered one.
                self.channel
                    .publish(message.clone(), retry_count + 1, self.interval)
                    .await?;
                Ok(())
            }
            Ok(false) => {
                self.escalate(message, retry_count, FinalStatus::Timeout)
                    .await
            }
            Err(AdapterError::Gateway(err)) => {
                tracing::error!(charge_ref = %message.charge_ref, "status check failed: {}", err);
                self.escalate(message, retry_count, FinalStatus::Error).await
            }
            Err(other) => Err(other),
        }
    }

    async fn escalate(
        &self,
        message: &StatusCheckMessage,
        retry_count: u32,
        final_status: FinalStatus,
    ) -> Result<(), AdapterError> {
        tracing::warn!(
            charge_ref = %message.charge_ref,
            payment_id = %message.payment_id,
            retry = retry_count,
            final_status = final_status.as_str(),
            "escalating status check to dead letter"
        );

        let record = DeadLetterRecord {
            check: message.clone(),
            retry_count,
            final_status,
            origin_queue: self.queue_name.clone(),
        };
        self.channel.publish_dead_letter(record).await?;
        Ok(())
    }
}

/// Consumer loop. Acks only after the state-machine branch completes; a
/// failed delivery stays pending for broker redelivery.
pub async fn run_status_check_consumer<G, S, C, K>(
    listener: StatusCheckListener<G, S, C>,
    mut consumer: K,
) where
    G: ChargeGateway,
    S: AsyncSender<ChargeResponseMessage>,
    C: DelayedRedeliveryChannel,
    K: DelayedRedeliveryConsumer,
{
    loop {
        match consumer.next().await {
            Ok(Some(delivery)) => match listener.on_delivery(&delivery).await {
                Ok(()) => {
                    if let Err(err) = consumer.ack(&delivery).await {
                        tracing::error!("status check ack failed: {}", err);
                    }
                }
                Err(err) => {
                    tracing::error!("status check delivery failed, left unacked: {}", err);
                }
            },
            Ok(None) => {
                tracing::info!("status check channel closed");
                return;
            }
            Err(err) => {
                tracing::error!("status check consume error: {}", err);
                tokio::time::sleep(Duration::from_millis(500)).await;
            }
        }
    }
}
