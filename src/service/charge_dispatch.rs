use crate::broker::DelayedRedeliveryChannel;
use crate::checkstate::registrar::StatusCheckRegistrar;
use crate::domain::charge::{ChargeStatus, CreateCharge};
use crate::error::AdapterError;
use crate::gateways::ChargeGateway;
use crate::messaging::contracts::{ChargeRequestMessage, ChargeResponseMessage};
use crate::messaging::validation::validate_charge_request;
use crate::messaging::{AsyncListener, AsyncSender, MessageHandler};
use std::sync::Arc;

/// Consumes inbound charge requests: one gateway call, exactly one response
/// published. Charges acknowledged as still processing get a status check
/// registered; all further retry semantics live in the poll scheduler.
pub struct ChargeRequestHandler<G, S, C> {
    pub gateway: Arc<G>,
    pub responses: Arc<S>,
    pub registrar: StatusCheckRegistrar<C>,
}

#[async_trait::async_trait]
impl<G, S, C> MessageHandler<ChargeRequestMessage> for ChargeRequestHandler<G, S, C>
where
    G: ChargeGateway,
    S: AsyncSender<ChargeResponseMessage>,
    C: DelayedRedeliveryChannel,
{
    async fn handle(&self, message: ChargeRequestMessage) -> Result<(), AdapterError> {
        tracing::info!(
            payment_id = %message.payment_id,
            amount = %message.amount,
            currency = %message.currency,
            "charge request received"
        );

        let create = CreateCharge {
            amount: message.amount,
            currency: message.currency.clone(),
            order_id: message.payment_id,
        };

        match self.gateway.create_charge(create).await {
            Ok(snapshot) => {
                tracing::info!(
                    payment_id = %message.payment_id,
                    status = ?snapshot.status,
                    "charge sent for payment processing"
                );

                self.responses
                    .send(ChargeResponseMessage::from_snapshot(&snapshot))
                    .await?;

                if snapshot.status == ChargeStatus::Processing {
                    self.registrar
                        .register(
                            snapshot.charge_id,
                            message.payment_id,
                            message.amount,
                            &message.currency,
                        )
                        .await?;
                }
                Ok(())
            }
            Err(err) => {
                tracing::error!(
                    payment_id = %message.payment_id,
                    "charge creation failed, sending fail-safe cancellation: {}",
                    err
                );

                self.responses
                    .send(ChargeResponseMessage::fail_safe_cancellation(&message))
                    .await
            }
        }
    }
}

/// Transport-facing adapter: validates the decoded request before any
/// business logic runs. Invalid requests fail here without gateway contact.
pub struct ChargeRequestListener<H> {
    pub handler: H,
}

#[async_trait::async_trait]
impl<H> AsyncListener<ChargeRequestMessage> for ChargeRequestListener<H>
where
    H: MessageHandler<ChargeRequestMessage>,
{
    async fn on_message(&self, message: ChargeRequestMessage) -> Result<(), AdapterError> {
        validate_charge_request(&message)?;
        self.handler.handle(message).await
    }
}
