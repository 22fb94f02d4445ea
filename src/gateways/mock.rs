use crate::domain::charge::{ChargeSnapshot, ChargeStatus, CreateCharge};
use crate::error::GatewayError;
use crate::gateways::ChargeGateway;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Debug, Clone, Copy)]
pub enum MockBehavior {
    /// `create_charge` settles immediately.
    Succeed,
    /// `create_charge` acknowledges with `Processing`; `retrieve_charge`
    /// keeps reporting `Processing` until the charge has been polled
    /// `polls_until_terminal` times, then reports `terminal`.
    ProcessingThen {
        polls_until_terminal: u32,
        terminal: ChargeStatus,
    },
    /// Every call fails with a transport error.
    Unreachable,
}

struct MockCharge {
    order_id: Uuid,
    amount: Decimal,
    currency: String,
    polls: u32,
}

pub struct MockGateway {
    behavior: MockBehavior,
    charges: Mutex<HashMap<Uuid, MockCharge>>,
    create_calls: AtomicUsize,
    retrieve_calls: AtomicUsize,
}

impl MockGateway {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            charges: Mutex::new(HashMap::new()),
            create_calls: AtomicUsize::new(0),
            retrieve_calls: AtomicUsize::new(0),
        }
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn retrieve_calls(&self) -> usize {
        self.retrieve_calls.load(Ordering::SeqCst)
    }

    fn unreachable(context: &str) -> GatewayError {
        GatewayError::Unreachable {
            context: context.to_string(),
            detail: "mock transport failure".to_string(),
        }
    }
}

#[async_trait::async_trait]
impl ChargeGateway for MockGateway {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn create_charge(&self, request: CreateCharge) -> Result<ChargeSnapshot, GatewayError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);

        let status = match self.behavior {
            MockBehavior::Unreachable => return Err(Self::unreachable("POST /charges")),
            MockBehavior::Succeed => ChargeStatus::Succeeded,
            MockBehavior::ProcessingThen { .. } => ChargeStatus::Processing,
        };

        let charge_id = Uuid::new_v4();
        self.charges.lock().await.insert(
            charge_id,
            MockCharge {
                order_id: request.order_id,
                amount: request.amount,
                currency: request.currency.clone(),
                polls: 0,
            },
        );

        Ok(ChargeSnapshot {
            charge_id,
            order_id: request.order_id,
            amount: request.amount,
            currency: request.currency,
            status,
            transaction_ref: charge_id,
        })
    }

    async fn retrieve_charge(&self, charge_id: Uuid) -> Result<ChargeSnapshot, GatewayError> {
        self.retrieve_calls.fetch_add(1, Ordering::SeqCst);

        let context = format!("GET /charges/{charge_id}");
        if matches!(self.behavior, MockBehavior::Unreachable) {
            return Err(Self::unreachable(&context));
        }

        let mut charges = self.charges.lock().await;
        let charge = charges.get_mut(&charge_id).ok_or(GatewayError::Status {
            context,
            status: 404,
        })?;
        charge.polls += 1;

        let status = match self.behavior {
            MockBehavior::ProcessingThen {
                polls_until_terminal,
                terminal,
            } if charge.polls < polls_until_terminal => ChargeStatus::Processing,
            MockBehavior::ProcessingThen { terminal, .. } => terminal,
            _ => ChargeStatus::Succeeded,
        };

        Ok(ChargeSnapshot {
            charge_id,
            order_id: charge.order_id,
            amount: charge.amount,
            currency: charge.currency.clone(),
            status,
            transaction_ref: charge_id,
        })
    }
}
