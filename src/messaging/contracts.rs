use crate::domain::charge::{ChargeSnapshot, ChargeStatus};
use crate::messaging::Message;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Envelope header names, reproduced bit-for-bit for compatibility with
/// delayed-exchange semantics.
pub const HEADER_DELAY: &str = "x-delay";
pub const HEADER_RETRY_COUNT: &str = "x-retry-count";
pub const HEADER_FINAL_STATUS: &str = "x-final-status";
pub const HEADER_ORIGINAL_QUEUE: &str = "x-original-queue";

/// One charge attempt for a payment. Consumed exactly once by dispatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChargeRequestMessage {
    pub message_id: Uuid,
    pub payment_id: Uuid,
    pub amount: Decimal,
    pub currency: String,
    pub occurred_at: DateTime<Utc>,
}

impl ChargeRequestMessage {
    pub fn new(payment_id: Uuid, amount: Decimal, currency: &str) -> Self {
        Self {
            message_id: Uuid::new_v4(),
            payment_id,
            amount,
            currency: currency.to_string(),
            occurred_at: Utc::now(),
        }
    }
}

impl Message for ChargeRequestMessage {
    fn message_id(&self) -> Uuid {
        self.message_id
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}

/// Gateway outcome for a charge. The payment id doubles as the message id
/// and correlation key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChargeResponseMessage {
    pub payment_id: Uuid,
    pub amount: Decimal,
    pub currency: String,
    pub transaction_ref: Option<Uuid>,
    pub status: ChargeStatus,
    pub occurred_at: DateTime<Utc>,
}

impl ChargeResponseMessage {
    pub fn from_snapshot(snapshot: &ChargeSnapshot) -> Self {
        Self {
            payment_id: snapshot.order_id,
            amount: snapshot.amount,
            currency: snapshot.currency.clone(),
            transaction_ref: Some(snapshot.transaction_ref),
            status: snapshot.status,
            occurred_at: Utc::now(),
        }
    }

    /// The dispatch fail-safe path: the gateway could not be reached, so no
    /// transaction ref exists and the charge is reported as canceled.
    pub fn fail_safe_cancellation(request: &ChargeRequestMessage) -> Self {
        Self {
            payment_id: request.payment_id,
            amount: request.amount,
            currency: request.currency.clone(),
            transaction_ref: None,
            status: ChargeStatus::Canceled,
            occurred_at: Utc::now(),
        }
    }
}

impl Message for ChargeResponseMessage {
    fn message_id(&self) -> Uuid {
        self.payment_id
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}

/// Logical payload of one status poll. Retry metadata (`x-retry-count`,
/// `x-delay`) travels on the envelope, never here; each retry re-creates
/// the message instead of mutating it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCheckMessage {
    pub charge_ref: Uuid,
    pub payment_id: Uuid,
    pub amount: Decimal,
    pub currency: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FinalStatus {
    Timeout,
    Error,
}

impl FinalStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            FinalStatus::Timeout => "TIMEOUT",
            FinalStatus::Error => "ERROR",
        }
    }
}

/// Terminal escalation of a status check; consumed only by operators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeadLetterRecord {
    pub check: StatusCheckMessage,
    pub retry_count: u32,
    pub final_status: FinalStatus,
    pub origin_queue: String,
}
