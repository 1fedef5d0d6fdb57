use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::investmentmodel::Investment;

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
pub struct InitiatePaymentDto {
    #[serde(rename = "propertyId")]
    pub property_id: Uuid,

    #[validate(length(min = 1, message = "Plan is required"))]
    #[serde(rename = "planId")]
    pub plan_id: String,

    #[validate(range(min = 1, message = "Amount must be positive"))]
    pub amount: i64,

    pub currency: Option<String>,
}

/// Query string the provider appends when redirecting back to the
/// callback URL.
#[derive(Serialize, Deserialize, Validate)]
pub struct PaymentVerifyQueryDto {
    pub status: Option<String>,
    pub tx_ref: Option<String>,
    pub transaction_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InvestmentListResponseDto {
    pub status: String,
    pub investments: Vec<Investment>,
    pub results: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_amount_is_rejected() {
        let dto = InitiatePaymentDto {
            property_id: Uuid::new_v4(),
            plan_id: "growth-12m".to_string(),
            amount: 0,
            currency: None,
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn callback_query_tolerates_missing_fields() {
        let dto: PaymentVerifyQueryDto =
            serde_json::from_value(serde_json::json!({"status": "cancelled"})).unwrap();
        assert_eq!(dto.status.as_deref(), Some("cancelled"));
        assert!(dto.transaction_id.is_none());
    }
}
