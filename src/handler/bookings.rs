use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::{bookingdb::BookingExt, propertydb::PropertyExt},
    dtos::bookingdtos::{
        AdminBookingUpdateDto, BookingData, BookingListQueryDto, BookingResponseDto,
        CreateBookingDto,
    },
    error::HttpError,
    middleware::JWTAuthMiddeware,
    models::{bookingmodel::BookingStatus, usermodel::UserRole},
    service::access,
    AppState,
};

pub fn booking_handler() -> Router {
    Router::new()
        .route("/", get(list_bookings).post(create_booking))
        .route("/:booking_id/cancel", patch(cancel_booking))
}

pub fn admin_bookings_handler() -> Router {
    Router::new()
        .route("/", get(admin_list_bookings))
        .route("/:booking_id", patch(admin_update_booking))
}

pub async fn create_booking(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(body): Json<CreateBookingDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    app_state
        .db_client
        .get_property_by_id(body.property_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Property not found"))?;

    let booking = app_state
        .db_client
        .create_booking(
            auth.user.id,
            body.property_id,
            body.visit_date,
            body.visit_time,
            body.guest_count,
            body.special_requests,
        )
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(BookingResponseDto {
            status: "success".to_string(),
            data: BookingData { booking },
        }),
    ))
}

pub async fn list_bookings(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Query(query_params): Query<BookingListQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query_params
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let status = parse_status_filter(query_params.status.as_deref())?;
    let page = query_params.page.unwrap_or(1) as u32;
    let limit = query_params.limit.unwrap_or(10);

    // Admins see every booking; everyone else only their own.
    let user_filter = match auth.user.role {
        UserRole::Admin => None,
        _ => Some(auth.user.id),
    };

    let bookings = app_state
        .db_client
        .get_bookings(user_filter, query_params.property_id, status, page, limit)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "results": bookings.len(),
        "bookings": bookings,
    })))
}

pub async fn cancel_booking(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(booking_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let booking = app_state
        .db_client
        .get_booking_by_id(booking_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Booking not found"))?;

    access::require_owner_or_admin(&auth.user, booking.user_id)?;

    // Cancelling twice is a no-op, not an error.
    if booking.status == BookingStatus::Cancelled {
        return Ok(Json(BookingResponseDto {
            status: "success".to_string(),
            data: BookingData { booking },
        }));
    }

    let booking = app_state
        .db_client
        .cancel_booking(booking_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Booking not found"))?;

    Ok(Json(BookingResponseDto {
        status: "success".to_string(),
        data: BookingData { booking },
    }))
}

pub async fn admin_list_bookings(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query_params): Query<BookingListQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query_params
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let status = parse_status_filter(query_params.status.as_deref())?;
    let page = query_params.page.unwrap_or(1) as u32;
    let limit = query_params.limit.unwrap_or(10);

    let bookings = app_state
        .db_client
        .get_bookings(None, query_params.property_id, status, page, limit)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "results": bookings.len(),
        "bookings": bookings,
    })))
}

pub async fn admin_update_booking(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(booking_id): Path<Uuid>,
    Json(body): Json<AdminBookingUpdateDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let status = BookingStatus::from_str(&body.status)
        .ok_or_else(|| HttpError::bad_request(format!("Invalid status '{}'", body.status)))?;

    let booking = app_state
        .db_client
        .update_booking_status(booking_id, status, auth.user.id, body.admin_notes)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Booking not found"))?;

    Ok(Json(BookingResponseDto {
        status: "success".to_string(),
        data: BookingData { booking },
    }))
}

fn parse_status_filter(status: Option<&str>) -> Result<Option<BookingStatus>, HttpError> {
    match status {
        Some(value) => BookingStatus::from_str(value)
            .map(Some)
            .ok_or_else(|| HttpError::bad_request(format!("Invalid status '{}'", value))),
        None => Ok(None),
    }
}
