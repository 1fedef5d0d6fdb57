use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::bookingmodel::Booking;

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookingDto {
    #[serde(rename = "propertyId")]
    pub property_id: Uuid,

    #[serde(rename = "visitDate")]
    pub visit_date: DateTime<Utc>,

    #[validate(length(min = 1, message = "Visit time is required"))]
    #[serde(rename = "visitTime")]
    pub visit_time: String,

    #[validate(range(min = 1, message = "At least one guest is required"))]
    #[serde(rename = "guestCount")]
    pub guest_count: i32,

    #[serde(rename = "specialRequests")]
    pub special_requests: Option<String>,
}

#[derive(Serialize, Deserialize, Validate)]
pub struct BookingListQueryDto {
    #[validate(range(min = 1))]
    pub page: Option<usize>,
    #[validate(range(min = 1, max = 50))]
    pub limit: Option<usize>,

    #[serde(rename = "propertyId")]
    pub property_id: Option<Uuid>,
    pub status: Option<String>,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct AdminBookingUpdateDto {
    #[validate(length(min = 1, message = "Status is required"))]
    pub status: String,

    #[serde(rename = "adminNotes")]
    pub admin_notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BookingData {
    pub booking: Booking,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BookingResponseDto {
    pub status: String,
    pub data: BookingData,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_guests_is_rejected() {
        let dto = CreateBookingDto {
            property_id: Uuid::new_v4(),
            visit_date: Utc::now(),
            visit_time: "10:00".to_string(),
            guest_count: 0,
            special_requests: None,
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn camel_case_payload_deserializes() {
        let raw = serde_json::json!({
            "propertyId": Uuid::new_v4(),
            "visitDate": "2026-09-15T10:00:00Z",
            "visitTime": "10:00",
            "guestCount": 2,
        });
        let dto: CreateBookingDto = serde_json::from_value(raw).unwrap();
        assert_eq!(dto.guest_count, 2);
        assert!(dto.validate().is_ok());
    }
}
