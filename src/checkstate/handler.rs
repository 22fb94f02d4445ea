use crate::domain::charge::ChargeStatus;
use crate::error::AdapterError;
use crate::gateways::ChargeGateway;
use crate::messaging::contracts::ChargeResponseMessage;
use crate::messaging::AsyncSender;
use std::sync::Arc;
use uuid::Uuid;

/// One poll against the gateway. Terminal outcomes feed back into response
/// ingestion through the response sender.
pub struct StatusCheckHandler<G, S> {
    pub gateway: Arc<G>,
    pub responses: Arc<S>,
}

impl<G, S> StatusCheckHandler<G, S>
where
    G: ChargeGateway,
    S: AsyncSender<ChargeResponseMessage>,
{
    /// Returns `true` once the charge has left `Processing`.
    pub async fn handle(&self, charge_ref: Uuid) -> Result<bool, AdapterError> {
        tracing::info!(%charge_ref, "checking charge status");

        let snapshot = self.gateway.retrieve_charge(charge_ref).await?;
        tracing::info!(%charge_ref, status = ?snapshot.status, "current charge status");

        if snapshot.status == ChargeStatus::Processing {
            return Ok(false);
        }

        self.responses
            .send(ChargeResponseMessage::from_snapshot(&snapshot))
            .await?;
        Ok(true)
    }
}
