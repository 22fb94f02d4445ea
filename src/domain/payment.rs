use crate::domain::charge::ChargeStatus;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The externally owned payment aggregate, seen here only through the
/// `PaymentStore` boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub payment_id: Uuid,
    pub amount: Decimal,
    pub currency: String,
    pub status: ChargeStatus,
    pub transaction_ref: Option<Uuid>,
}

impl Payment {
    pub fn processing(payment_id: Uuid, amount: Decimal, currency: &str) -> Self {
        Self {
            payment_id,
            amount,
            currency: currency.to_string(),
            status: ChargeStatus::Processing,
            transaction_ref: None,
        }
    }
}
