use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "property_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PropertyStatus {
    Pending,   // Newly created, awaiting admin review
    Approved,  // The only status exposed to public search
    Rejected,  // Failed review, carries a rejection reason
    Suspended, // Temporarily pulled by an admin
    Sold,
}

impl PropertyStatus {
    pub fn to_str(&self) -> &str {
        match self {
            PropertyStatus::Pending => "pending",
            PropertyStatus::Approved => "approved",
            PropertyStatus::Rejected => "rejected",
            PropertyStatus::Suspended => "suspended",
            PropertyStatus::Sold => "sold",
        }
    }

    pub fn from_str(value: &str) -> Option<PropertyStatus> {
        match value {
            "pending" => Some(PropertyStatus::Pending),
            "approved" => Some(PropertyStatus::Approved),
            "rejected" => Some(PropertyStatus::Rejected),
            "suspended" => Some(PropertyStatus::Suspended),
            "sold" => Some(PropertyStatus::Sold),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "listing_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ListingType {
    Sale,
    Rent,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "property_category", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PropertyCategory {
    Residential,
    Commercial,
    Land,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Property {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub agent_id: Option<Uuid>,

    pub title: String,
    pub description: String,

    // Base-currency price; the USD price is manual and never derived
    // from an exchange rate.
    pub price: i64,
    pub price_usd: Option<i64>,
    pub listing_type: ListingType,
    pub category: PropertyCategory,

    pub location: String,
    pub beds: Option<i32>,
    pub baths: Option<i32>,
    pub sqft: Option<i32>,

    pub images: JsonValue,
    pub amenities: JsonValue,

    pub contact_name: String,
    pub contact_email: String,
    pub contact_phone: String,

    pub status: PropertyStatus,

    /// Independent of status; only admins may flip it.
    pub verified: bool,

    pub views: i64,
    pub favorites: i64,

    pub approved_at: Option<DateTime<Utc>>,
    pub approved_by: Option<Uuid>,
    pub rejection_reason: Option<String>,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,

    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_str() {
        for status in [
            PropertyStatus::Pending,
            PropertyStatus::Approved,
            PropertyStatus::Rejected,
            PropertyStatus::Suspended,
            PropertyStatus::Sold,
        ] {
            assert_eq!(PropertyStatus::from_str(status.to_str()), Some(status));
        }
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert_eq!(PropertyStatus::from_str("active"), None);
        assert_eq!(PropertyStatus::from_str("APPROVED"), None);
    }
}
