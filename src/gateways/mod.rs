use crate::domain::charge::{ChargeSnapshot, CreateCharge};
use crate::error::GatewayError;
use uuid::Uuid;

pub mod mock;
pub mod xpayment;

/// Synchronous boundary to the external payment gateway. Both calls may
/// fail with a transport error; retry semantics live with the callers.
#[async_trait::async_trait]
pub trait ChargeGateway: Send + Sync {
    fn name(&self) -> &'static str;

    async fn create_charge(&self, request: CreateCharge) -> Result<ChargeSnapshot, GatewayError>;

    async fn retrieve_charge(&self, charge_id: Uuid) -> Result<ChargeSnapshot, GatewayError>;
}
