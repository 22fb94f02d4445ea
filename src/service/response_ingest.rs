use crate::error::AdapterError;
use crate::messaging::contracts::ChargeResponseMessage;
use crate::messaging::{AsyncListener, MessageHandler};
use crate::store::PaymentStore;
use std::sync::Arc;

/// Records the gateway-assigned transaction reference on the payment
/// aggregate. Idempotent under at-least-once delivery, and a payment
/// already in a terminal status is never updated again.
pub struct ChargeResponseHandler<P> {
    pub store: Arc<P>,
}

#[async_trait::async_trait]
impl<P: PaymentStore> MessageHandler<ChargeResponseMessage> for ChargeResponseHandler<P> {
    async fn handle(&self, message: ChargeResponseMessage) -> Result<(), AdapterError> {
        tracing::info!(
            payment_id = %message.payment_id,
            status = ?message.status,
            transaction_ref = ?message.transaction_ref,
            "charge response received"
        );

        let mut payment = self
            .store
            .find_by_id(message.payment_id)
            .await?
            .ok_or(AdapterError::CorrelationNotFound(message.payment_id))?;

        if payment.status.is_terminal() {
            tracing::debug!(
                payment_id = %message.payment_id,
                "payment already settled, ignoring update"
            );
            return Ok(());
        }

        let transaction_ref = message.transaction_ref.or(payment.transaction_ref);
        if payment.transaction_ref == transaction_ref && payment.status == message.status {
            // Duplicate delivery.
            return Ok(());
        }

        payment.transaction_ref = transaction_ref;
        payment.status = message.status;
        self.store.save(payment).await?;

        tracing::debug!(
            payment_id = %message.payment_id,
            transaction_ref = ?transaction_ref,
            "payment transaction ref recorded"
        );
        Ok(())
    }
}

/// Transport-facing adapter for the response channel.
pub struct ChargeResponseListener<H> {
    pub handler: H,
}

#[async_trait::async_trait]
impl<H> AsyncListener<ChargeResponseMessage> for ChargeResponseListener<H>
where
    H: MessageHandler<ChargeResponseMessage>,
{
    async fn on_message(&self, message: ChargeResponseMessage) -> Result<(), AdapterError> {
        self.handler.handle(message).await
    }
}
