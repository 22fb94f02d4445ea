use rust_decimal::Decimal;
use uuid::Uuid;

/// Rejections raised before any gateway contact. These surface to the
/// transport's own retry/dead-letter mechanism, never to business code.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("currency is missing")]
    CurrencyMissing,
    #[error("unknown ISO-4217 currency {0:?}")]
    UnknownCurrency(String),
    #[error("amount {0} is negative")]
    NegativeAmount(Decimal),
    #[error("amount scale {actual} does not match {currency} minor units {expected}")]
    ScaleMismatch {
        currency: String,
        expected: u32,
        actual: u32,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("{context}: {source}")]
    Transport {
        context: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{context}: gateway unreachable ({detail})")]
    Unreachable { context: String, detail: String },
    #[error("{context}: unexpected status {status}")]
    Status { context: String, status: u16 },
}

#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("redis channel error: {0}")]
    Redis(#[from] redis::RedisError),
    #[error("payload encode/decode failed: {0}")]
    Codec(#[from] serde_json::Error),
    #[error("channel is closed")]
    Closed,
}

#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error("payment {0} not found")]
    CorrelationNotFound(Uuid),
    #[error(transparent)]
    Channel(#[from] ChannelError),
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}
