use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::{config::Config, error::HttpError};

/// Provider-side failures. Converted to sanitized HttpErrors at the
/// handler boundary; the full detail only reaches the logs.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Payment provider request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Payment provider rejected the request: {0}")]
    Rejected(String),

    #[error("Payment provider response missing field: {0}")]
    MalformedResponse(String),
}

impl From<ProviderError> for HttpError {
    fn from(error: ProviderError) -> Self {
        tracing::error!("{}", error);
        match error {
            ProviderError::Transport(_) => HttpError::server_error("Payment provider unavailable"),
            ProviderError::Rejected(_) => HttpError::server_error("Payment request was rejected"),
            ProviderError::MalformedResponse(_) => {
                HttpError::server_error("Unexpected payment provider response")
            }
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PaymentCustomer {
    pub email: String,
    pub name: String,
    pub phonenumber: String,
}

/// Metadata attached at initiation and echoed back by the provider on
/// verification. Recording trusts the verified copy, never the client's.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PaymentMeta {
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    #[serde(rename = "propertyId")]
    pub property_id: Uuid,
    #[serde(rename = "planId")]
    pub plan_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VerifiedPayment {
    pub status: String,
    pub amount: i64,
    pub charged_amount: i64,
    pub currency: String,
    pub tx_ref: String,
    pub meta: Option<PaymentMeta>,
}

impl VerifiedPayment {
    /// Provider-side success: the charge went through and the paid amount
    /// covers what was charged.
    pub fn is_successful(&self) -> bool {
        self.status == "successful" && self.amount >= self.charged_amount
    }

    /// Reads the `data` object of a verify response. The amounts must be
    /// present; a response without them is malformed, not a zero payment.
    fn from_provider_data(data: &serde_json::Value) -> Result<Self, ProviderError> {
        let amount = require_amount(data, "amount")?;
        let charged_amount = require_amount(data, "charged_amount")?;

        let meta = data
            .get("meta")
            .cloned()
            .and_then(|m| serde_json::from_value::<PaymentMeta>(m).ok());

        Ok(VerifiedPayment {
            status: data["status"].as_str().unwrap_or_default().to_string(),
            amount,
            charged_amount,
            currency: data["currency"].as_str().unwrap_or_default().to_string(),
            tx_ref: data["tx_ref"].as_str().unwrap_or_default().to_string(),
            meta,
        })
    }
}

fn require_amount(data: &serde_json::Value, field: &str) -> Result<i64, ProviderError> {
    data[field]
        .as_f64()
        .map(|value| value.round() as i64)
        .ok_or_else(|| ProviderError::MalformedResponse(format!("data.{}", field)))
}

pub fn investment_reference(user_id: Uuid) -> String {
    format!("inv_{}_{}", Utc::now().timestamp_millis(), user_id)
}

/// Upper bound on any single provider call so a hung provider cannot
/// hold the surrounding request open indefinitely.
const PROVIDER_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

pub struct PaymentProviderService {
    secret_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl PaymentProviderService {
    pub fn new(config: &Config) -> Self {
        let client = reqwest::Client::builder()
            .timeout(PROVIDER_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self {
            secret_key: config.flutterwave_secret_key.clone(),
            base_url: config.flutterwave_base_url().to_string(),
            client,
        }
    }

    /// Creates a hosted payment link. Returns the redirect URL the client
    /// should be sent to.
    pub async fn initiate_payment(
        &self,
        tx_ref: &str,
        amount: i64,
        currency: &str,
        customer: PaymentCustomer,
        redirect_url: &str,
        meta: &PaymentMeta,
    ) -> Result<String, ProviderError> {
        let payload = serde_json::json!({
            "tx_ref": tx_ref,
            "amount": amount,
            "currency": currency,
            "payment_options": "card,banktransfer,ussd",
            "redirect_url": redirect_url,
            "customer": customer,
            "meta": meta,
            "customizations": {
                "title": "Property Investment",
                "description": "Payment for property investment",
            },
        });

        let response = self
            .client
            .post(format!("{}/payments", self.base_url))
            .header("Authorization", format!("Bearer {}", self.secret_key))
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await?;

        let body: serde_json::Value = response.json().await?;

        if body["status"].as_str() == Some("success") {
            body["data"]["link"]
                .as_str()
                .map(String::from)
                .ok_or_else(|| ProviderError::MalformedResponse("data.link".to_string()))
        } else {
            Err(ProviderError::Rejected(body.to_string()))
        }
    }

    /// Verifies a transaction with the provider. Only the amounts and meta
    /// in this response are trusted for recording.
    pub async fn verify_transaction(
        &self,
        transaction_id: &str,
    ) -> Result<VerifiedPayment, ProviderError> {
        let url = format!("{}/transactions/{}/verify", self.base_url, transaction_id);

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.secret_key))
            .send()
            .await?;

        let body: serde_json::Value = response.json().await?;

        if body["status"].as_str() != Some("success") {
            return Err(ProviderError::Rejected(body.to_string()));
        }

        VerifiedPayment::from_provider_data(&body["data"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn investment_reference_embeds_the_user() {
        let user_id = Uuid::new_v4();
        let reference = investment_reference(user_id);
        assert!(reference.starts_with("inv_"));
        assert!(reference.ends_with(&user_id.to_string()));
    }

    #[test]
    fn successful_payment_requires_full_charge_coverage() {
        let mut payment = VerifiedPayment {
            status: "successful".to_string(),
            amount: 500,
            charged_amount: 500,
            currency: "USD".to_string(),
            tx_ref: "inv_1_x".to_string(),
            meta: None,
        };
        assert!(payment.is_successful());

        payment.amount = 499;
        assert!(!payment.is_successful());

        payment.amount = 500;
        payment.status = "failed".to_string();
        assert!(!payment.is_successful());
    }

    #[test]
    fn verify_data_with_amounts_parses() {
        let raw = serde_json::json!({
            "status": "successful",
            "amount": 500.0,
            "charged_amount": 500.0,
            "currency": "NGN",
            "tx_ref": "inv_1_x",
        });

        let payment = VerifiedPayment::from_provider_data(&raw).unwrap();
        assert_eq!(payment.amount, 500);
        assert_eq!(payment.charged_amount, 500);
        assert!(payment.is_successful());
    }

    #[test]
    fn verify_data_without_an_amount_is_malformed() {
        let raw = serde_json::json!({
            "status": "successful",
            "charged_amount": 500.0,
            "currency": "NGN",
            "tx_ref": "inv_1_x",
        });

        let err = VerifiedPayment::from_provider_data(&raw).unwrap_err();
        assert!(matches!(err, ProviderError::MalformedResponse(ref field) if field == "data.amount"));
    }

    #[test]
    fn verify_data_without_a_charged_amount_is_malformed() {
        let raw = serde_json::json!({
            "status": "successful",
            "amount": 500.0,
        });

        let err = VerifiedPayment::from_provider_data(&raw).unwrap_err();
        assert!(
            matches!(err, ProviderError::MalformedResponse(ref field) if field == "data.charged_amount")
        );
    }

    #[test]
    fn provider_client_is_built_with_a_timeout() {
        let config = Config {
            database_url: String::new(),
            app_url: "http://localhost:3000".to_string(),
            jwt_secret: "secret".to_string(),
            jwt_maxage: 1440,
            port: 8000,
            flutterwave_secret_key: "sk_test".to_string(),
            flutterwave_environment: "sandbox".to_string(),
        };

        let service = PaymentProviderService::new(&config);
        assert_eq!(service.base_url, config.flutterwave_base_url());
        assert_eq!(PROVIDER_TIMEOUT, std::time::Duration::from_secs(30));
    }

    #[test]
    fn meta_deserializes_from_provider_payload() {
        let user_id = Uuid::new_v4();
        let property_id = Uuid::new_v4();
        let raw = serde_json::json!({
            "userId": user_id,
            "propertyId": property_id,
            "planId": "growth-12m",
        });

        let meta: PaymentMeta = serde_json::from_value(raw).unwrap();
        assert_eq!(meta.user_id, user_id);
        assert_eq!(meta.property_id, property_id);
        assert_eq!(meta.plan_id, "growth-12m");
    }
}
