#![allow(dead_code)]

use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Mutex;
use uuid::Uuid;
use xpayment_adapter::error::AdapterError;
use xpayment_adapter::messaging::contracts::{ChargeRequestMessage, ChargeResponseMessage};
use xpayment_adapter::messaging::{AsyncListener, AsyncSender};

pub fn amount(s: &str) -> Decimal {
    Decimal::from_str(s).expect("literal amount")
}

pub fn charge_request(amount_str: &str, currency: &str) -> ChargeRequestMessage {
    ChargeRequestMessage::new(Uuid::new_v4(), amount(amount_str), currency)
}

/// Captures everything published through it.
#[derive(Default)]
pub struct RecordingSender {
    pub sent: Mutex<Vec<ChargeResponseMessage>>,
}

impl RecordingSender {
    pub fn taken(&self) -> Vec<ChargeResponseMessage> {
        self.sent.lock().expect("sender lock").clone()
    }
}

#[async_trait::async_trait]
impl AsyncSender<ChargeResponseMessage> for RecordingSender {
    async fn send(&self, message: ChargeResponseMessage) -> Result<(), AdapterError> {
        self.sent.lock().expect("sender lock").push(message);
        Ok(())
    }
}

/// Captures everything delivered to it.
#[derive(Default)]
pub struct CollectingListener {
    pub seen: Mutex<Vec<ChargeResponseMessage>>,
}

impl CollectingListener {
    pub fn taken(&self) -> Vec<ChargeResponseMessage> {
        self.seen.lock().expect("listener lock").clone()
    }
}

#[async_trait::async_trait]
impl AsyncListener<ChargeResponseMessage> for CollectingListener {
    async fn on_message(&self, message: ChargeResponseMessage) -> Result<(), AdapterError> {
        self.seen.lock().expect("listener lock").push(message);
        Ok(())
    }
}
