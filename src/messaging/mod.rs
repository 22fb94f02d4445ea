use crate::error::AdapterError;
use chrono::{DateTime, Utc};
use uuid::Uuid;

pub mod contracts;
pub mod validation;

/// Minimal envelope capability: every message carries a unique identifier
/// and the moment the event occurred. Immutable once published.
pub trait Message: Send + Sync {
    fn message_id(&self) -> Uuid;
    fn occurred_at(&self) -> DateTime<Utc>;
}

/// Handler→transport boundary.
#[async_trait::async_trait]
pub trait AsyncSender<M: Message>: Send + Sync {
    async fn send(&self, message: M) -> Result<(), AdapterError>;
}

/// Transport→handler boundary. Implementations validate transport-decoded
/// messages before delegating to a `MessageHandler`; they perform no
/// business logic of their own.
#[async_trait::async_trait]
pub trait AsyncListener<M: Message>: Send + Sync {
    async fn on_message(&self, message: M) -> Result<(), AdapterError>;
}

/// Business logic, decoupled from transport. Handlers may assume the
/// message satisfies the validation contract and that deliveries sharing a
/// correlation key arrive in publish order; deliveries with different keys
/// carry no ordering guarantee.
#[async_trait::async_trait]
pub trait MessageHandler<M: Message>: Send + Sync {
    async fn handle(&self, message: M) -> Result<(), AdapterError>;
}
