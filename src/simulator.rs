use crate::domain::charge::ChargeStatus;
use crate::error::AdapterError;
use crate::messaging::contracts::{ChargeRequestMessage, ChargeResponseMessage};
use crate::messaging::{AsyncListener, AsyncSender};
use chrono::Utc;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use uuid::Uuid;

#[derive(Debug, Clone, Copy)]
pub struct EmissionSchedule {
    pub first: Duration,
    pub second: Duration,
    pub terminal: Duration,
}

impl Default for EmissionSchedule {
    fn default() -> Self {
        Self {
            first: Duration::ZERO,
            second: Duration::from_secs(10),
            terminal: Duration::from_secs(20),
        }
    }
}

/// Deterministic stand-in for the gateway's asynchronous event stream. Each
/// accepted request produces two `Processing` emissions and one terminal
/// emission to the registered listener, off the caller's task. Stateless
/// across calls apart from the minted transaction reference.
pub struct SimulatedXPaymentBroker<L> {
    listener: Arc<L>,
    schedule: EmissionSchedule,
    tasks: Mutex<JoinSet<()>>,
}

impl<L> SimulatedXPaymentBroker<L>
where
    L: AsyncListener<ChargeResponseMessage> + 'static,
{
    pub fn new(listener: Arc<L>, schedule: EmissionSchedule) -> Self {
        Self {
            listener,
            schedule,
            tasks: Mutex::new(JoinSet::new()),
        }
    }

    /// `Succeeded` iff the integral part of the amount is even.
    pub fn terminal_status(amount: Decimal) -> ChargeStatus {
        let even = amount
            .floor()
            .to_i64()
            .map(|units| units % 2 == 0)
            .unwrap_or(false);
        if even {
            ChargeStatus::Succeeded
        } else {
            ChargeStatus::Canceled
        }
    }

    /// Cancels emissions that have not fired yet.
    pub async fn shutdown(&self) {
        self.tasks.lock().await.abort_all();
    }

    fn emission(
        request: &ChargeRequestMessage,
        transaction_ref: Uuid,
        status: ChargeStatus,
    ) -> ChargeResponseMessage {
        ChargeResponseMessage {
            payment_id: request.payment_id,
            amount: request.amount,
            currency: request.currency.clone(),
            transaction_ref: Some(transaction_ref),
            status,
            occurred_at: Utc::now(),
        }
    }
}

#[async_trait::async_trait]
impl<L> AsyncSender<ChargeRequestMessage> for SimulatedXPaymentBroker<L>
where
    L: AsyncListener<ChargeResponseMessage> + 'static,
{
    async fn send(&self, request: ChargeRequestMessage) -> Result<(), AdapterError> {
        let transaction_ref = Uuid::new_v4();
        let terminal = Self::terminal_status(request.amount);
        tracing::info!(
            payment_id = %request.payment_id,
            amount = %request.amount,
            %transaction_ref,
            "simulated gateway accepted charge request"
        );

        let emissions = [
            (self.schedule.first, ChargeStatus::Processing),
            (self.schedule.second, ChargeStatus::Processing),
            (self.schedule.terminal, terminal),
        ];

        let mut tasks = self.tasks.lock().await;
        for (delay, status) in emissions {
            let listener = Arc::clone(&self.listener);
            let request = request.clone();
            tasks.spawn(async move {
                tokio::time::sleep(delay).await;
                let response = Self::emission(&request, transaction_ref, status);
                if let Err(err) = listener.on_message(response).await {
                    tracing::error!("simulated emission failed: {}", err);
                }
            });
        }

        Ok(())
    }
}
