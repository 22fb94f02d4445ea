use crate::domain::payment::Payment;
use anyhow::Result;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Narrow boundary to the externally owned payment store. Handlers touch at
/// most one payment aggregate per invocation, so no cross-payment locking
/// is required behind this trait.
#[async_trait::async_trait]
pub trait PaymentStore: Send + Sync {
    async fn find_by_id(&self, payment_id: Uuid) -> Result<Option<Payment>>;

    async fn save(&self, payment: Payment) -> Result<()>;
}

#[derive(Default)]
pub struct InMemoryPaymentStore {
    payments: RwLock<HashMap<Uuid, Payment>>,
}

impl InMemoryPaymentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn put(&self, payment: Payment) {
        self.payments
            .write()
            .await
            .insert(payment.payment_id, payment);
    }
}

#[async_trait::async_trait]
impl PaymentStore for InMemoryPaymentStore {
    async fn find_by_id(&self, payment_id: Uuid) -> Result<Option<Payment>> {
        Ok(self.payments.read().await.get(&payment_id).cloned())
    }

    async fn save(&self, payment: Payment) -> Result<()> {
        self.payments
            .write()
            .await
            .insert(payment.payment_id, payment);
        Ok(())
    }
}
