use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChargeStatus {
    Processing,
    Succeeded,
    Canceled,
}

impl ChargeStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, ChargeStatus::Processing)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateCharge {
    pub amount: Decimal,
    pub currency: String,
    /// Correlation id carried through the gateway: the payment identifier.
    pub order_id: Uuid,
}

/// The gateway-side view of a charge, as returned by both `create_charge`
/// and `retrieve_charge`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChargeSnapshot {
    pub charge_id: Uuid,
    pub order_id: Uuid,
    pub amount: Decimal,
    pub currency: String,
    pub status: ChargeStatus,
    pub transaction_ref: Uuid,
}
