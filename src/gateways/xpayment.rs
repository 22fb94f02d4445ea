use crate::domain::charge::{ChargeSnapshot, ChargeStatus, CreateCharge};
use crate::error::GatewayError;
use crate::gateways::ChargeGateway;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

pub struct XPaymentGateway {
    pub base_url: String,
    pub api_key: String,
    pub timeout_ms: u64,
    pub client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct ChargeBody {
    id: Uuid,
    order: Uuid,
    amount: Decimal,
    currency: String,
    status: ChargeStatus,
}

impl ChargeBody {
    fn into_snapshot(self) -> ChargeSnapshot {
        // The gateway reuses the charge id as the transaction reference.
        ChargeSnapshot {
            charge_id: self.id,
            order_id: self.order,
            amount: self.amount,
            currency: self.currency,
            status: self.status,
            transaction_ref: self.id,
        }
    }
}

impl XPaymentGateway {
    async fn decode(
        resp: reqwest::Response,
        context: &str,
    ) -> Result<ChargeSnapshot, GatewayError> {
        if !resp.status().is_success() {
            return Err(GatewayError::Status {
                context: context.to_string(),
                status: resp.status().as_u16(),
            });
        }

        let body: ChargeBody = resp.json().await.map_err(|source| GatewayError::Transport {
            context: context.to_string(),
            source,
        })?;
        Ok(body.into_snapshot())
    }
}

#[async_trait::async_trait]
impl ChargeGateway for XPaymentGateway {
    fn name(&self) -> &'static str {
        "xpayment"
    }

    async fn create_charge(&self, request: CreateCharge) -> Result<ChargeSnapshot, GatewayError> {
        let context = "POST /charges".to_string();
        let url = format!("{}/charges", self.base_url);
        let body = json!({
            "amount": request.amount,
            "currency": request.currency,
            "order": request.order_id,
        });

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .timeout(std::time::Duration::from_millis(self.timeout_ms))
            .send()
            .await
            .map_err(|source| GatewayError::Transport {
                context: context.clone(),
                source,
            })?;

        Self::decode(resp, &context).await
    }

    async fn retrieve_charge(&self, charge_id: Uuid) -> Result<ChargeSnapshot, GatewayError> {
        let context = format!("GET /charges/{charge_id}");
        let url = format!("{}/charges/{charge_id}", self.base_url);

        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .timeout(std::time::Duration::from_millis(self.timeout_ms))
            .send()
            .await
            .map_err(|source| GatewayError::Transport {
                context: context.clone(),
                source,
            })?;

        Self::decode(resp, &context).await
    }
}
