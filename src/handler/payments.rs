use std::sync::Arc;

use axum::{
    extract::Query,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use validator::Validate;

use crate::{
    db::{
        investmentdb::{InvestmentExt, RecordOutcome},
        propertydb::PropertyExt,
    },
    dtos::investmentdtos::{InitiatePaymentDto, InvestmentListResponseDto, PaymentVerifyQueryDto},
    error::HttpError,
    middleware::JWTAuthMiddeware,
    service::payment_provider::{
        investment_reference, PaymentCustomer, PaymentMeta, PaymentProviderService,
    },
    AppState,
};

pub fn payment_handler() -> Router {
    Router::new()
        .route("/initiate", post(initiate_payment))
        .route("/investments", get(list_investments))
}

/// The provider redirects here after checkout; no session is attached.
pub fn payment_callback_handler() -> Router {
    Router::new().route("/verify", get(verify_payment))
}

pub async fn initiate_payment(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(body): Json<InitiatePaymentDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    app_state
        .db_client
        .get_property_by_id(body.property_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Property not found"))?;

    let tx_ref = investment_reference(auth.user.id);
    let meta = PaymentMeta {
        user_id: auth.user.id,
        property_id: body.property_id,
        plan_id: body.plan_id.clone(),
    };
    let customer = PaymentCustomer {
        email: auth.user.email.clone(),
        name: auth.user.name.clone(),
        phonenumber: auth.user.phone.clone().unwrap_or_default(),
    };
    let redirect_url = format!("{}/api/payments/verify", app_state.env.app_url);
    let currency = body.currency.as_deref().unwrap_or("USD");

    let provider = PaymentProviderService::new(&app_state.env);
    let link = provider
        .initiate_payment(&tx_ref, body.amount, currency, customer, &redirect_url, &meta)
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "link": link,
            "reference": tx_ref,
        },
    })))
}

pub async fn verify_payment(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query_params): Query<PaymentVerifyQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query_params
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    if query_params.status.as_deref() == Some("cancelled") {
        return Err(HttpError::bad_request("Payment was cancelled"));
    }

    let transaction_id = query_params
        .transaction_id
        .as_deref()
        .ok_or_else(|| HttpError::bad_request("Missing transaction id"))?;

    let provider = PaymentProviderService::new(&app_state.env);
    let verified = provider.verify_transaction(transaction_id).await?;

    if !verified.is_successful() {
        return Err(HttpError::bad_request("Payment was not successful"));
    }

    // Recording trusts only the verified payload: the amounts, reference
    // and meta all come from the provider, not the redirect query.
    let meta = verified
        .meta
        .as_ref()
        .ok_or_else(|| HttpError::bad_request("Payment metadata is missing"))?;

    let description = format!("Investment in property {}", meta.property_id);
    let outcome = app_state
        .db_client
        .record_verified_investment(
            meta.user_id,
            meta.property_id,
            &meta.plan_id,
            verified.amount,
            &verified.tx_ref,
            Some(&description),
        )
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    match outcome {
        RecordOutcome::Created(investment) => Ok(Json(serde_json::json!({
            "status": "success",
            "data": { "investment": investment },
        }))),
        // A repeated callback for the same reference is a success, not
        // an error.
        RecordOutcome::AlreadyRecorded => Ok(Json(serde_json::json!({
            "status": "success",
            "message": "Payment already recorded",
        }))),
    }
}

pub async fn list_investments(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let investments = app_state
        .db_client
        .get_investments_for_user(auth.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let results = investments.len() as i64;
    Ok(Json(InvestmentListResponseDto {
        status: "success".to_string(),
        investments,
        results,
    }))
}
