use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::propertydb::{PropertyChanges, PropertySearchFilters},
    models::propertymodel::{ListingType, Property, PropertyCategory},
};

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct ContactDto {
    #[validate(length(min = 1, message = "Contact name is required"))]
    pub name: String,

    #[validate(
        length(min = 1, message = "Contact email is required"),
        email(message = "Contact email is invalid")
    )]
    pub email: String,

    #[validate(length(min = 5, message = "Contact phone must be at least 5 characters"))]
    pub phone: String,
}

/// Listing submission. Status, verification and the moderation stamps are
/// not representable here; a payload carrying them has those fields
/// dropped on deserialization and every new listing starts pending.
#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
pub struct CreatePropertyDto {
    #[validate(length(min = 3, message = "Title must be at least 3 characters"))]
    pub title: String,

    #[validate(length(min = 10, message = "Description must be at least 10 characters"))]
    pub description: String,

    #[validate(range(min = 0, message = "Price cannot be negative"))]
    pub price: i64,

    #[validate(range(min = 0, message = "USD price cannot be negative"))]
    #[serde(rename = "priceUsd")]
    pub price_usd: Option<i64>,

    #[serde(rename = "listingType")]
    pub listing_type: ListingType,

    pub category: PropertyCategory,

    #[validate(length(min = 1, message = "Location is required"))]
    pub location: String,

    #[validate(range(min = 0))]
    pub beds: Option<i32>,
    #[validate(range(min = 0))]
    pub baths: Option<i32>,
    #[validate(range(min = 0))]
    pub sqft: Option<i32>,

    pub images: Option<Vec<String>>,
    pub amenities: Option<Vec<String>>,

    #[serde(rename = "agentId")]
    pub agent_id: Option<Uuid>,

    #[validate]
    pub contact: ContactDto,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct UpdatePropertyDto {
    #[validate(length(min = 3, message = "Title must be at least 3 characters"))]
    pub title: Option<String>,

    #[validate(length(min = 10, message = "Description must be at least 10 characters"))]
    pub description: Option<String>,

    #[validate(range(min = 0, message = "Price cannot be negative"))]
    pub price: Option<i64>,

    #[validate(range(min = 0, message = "USD price cannot be negative"))]
    #[serde(rename = "priceUsd")]
    pub price_usd: Option<i64>,

    #[serde(rename = "listingType")]
    pub listing_type: Option<ListingType>,

    pub category: Option<PropertyCategory>,

    #[validate(length(min = 1, message = "Location cannot be empty"))]
    pub location: Option<String>,

    #[validate(range(min = 0))]
    pub beds: Option<i32>,
    #[validate(range(min = 0))]
    pub baths: Option<i32>,
    #[validate(range(min = 0))]
    pub sqft: Option<i32>,

    pub images: Option<Vec<String>>,
    pub amenities: Option<Vec<String>>,

    #[validate]
    pub contact: Option<ContactDto>,
}

impl UpdatePropertyDto {
    pub fn into_changes(self) -> PropertyChanges {
        let (contact_name, contact_email, contact_phone) = match self.contact {
            Some(contact) => (Some(contact.name), Some(contact.email), Some(contact.phone)),
            None => (None, None, None),
        };

        PropertyChanges {
            title: self.title,
            description: self.description,
            price: self.price,
            price_usd: self.price_usd,
            listing_type: self.listing_type,
            category: self.category,
            location: self.location,
            beds: self.beds,
            baths: self.baths,
            sqft: self.sqft,
            images: self.images,
            amenities: self.amenities,
            contact_name,
            contact_email,
            contact_phone,
        }
    }
}

#[derive(Serialize, Deserialize, Validate)]
pub struct PropertyListQueryDto {
    #[validate(range(min = 1))]
    pub page: Option<usize>,
    #[validate(range(min = 1, max = 50))]
    pub limit: Option<usize>,

    pub location: Option<String>,
    #[serde(rename = "listingType")]
    pub listing_type: Option<ListingType>,
    pub category: Option<PropertyCategory>,
    pub beds: Option<i32>,
    #[serde(rename = "minPrice")]
    pub min_price: Option<i64>,
    #[serde(rename = "maxPrice")]
    pub max_price: Option<i64>,
}

impl PropertyListQueryDto {
    pub fn filters(&self) -> PropertySearchFilters {
        PropertySearchFilters {
            location: self.location.clone(),
            listing_type: self.listing_type,
            category: self.category,
            min_beds: self.beds,
            min_price: self.min_price,
            max_price: self.max_price,
        }
    }
}

#[derive(Serialize, Deserialize, Validate)]
pub struct AdminPropertyQueryDto {
    #[validate(range(min = 1))]
    pub page: Option<usize>,
    #[validate(range(min = 1, max = 50))]
    pub limit: Option<usize>,

    pub status: Option<String>,
    pub search: Option<String>,
}

#[derive(Serialize, Deserialize, Validate)]
pub struct OwnerPropertyQueryDto {
    #[validate(range(min = 1))]
    pub page: Option<usize>,
    #[validate(range(min = 1, max = 50))]
    pub limit: Option<usize>,

    pub status: Option<String>,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct UpdatePropertyStatusDto {
    #[validate(length(min = 1, message = "Status is required"))]
    pub status: String,

    #[serde(rename = "rejectionReason")]
    pub rejection_reason: Option<String>,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct VerifyPropertyDto {
    pub verified: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PropertyListResponseDto {
    pub status: String,
    pub properties: Vec<Property>,
    pub results: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_dto() -> CreatePropertyDto {
        CreatePropertyDto {
            title: "Two-bed flat in Lekki".to_string(),
            description: "Bright two-bedroom apartment near the waterfront.".to_string(),
            price: 45_000_000,
            price_usd: Some(30_000),
            listing_type: ListingType::Sale,
            category: PropertyCategory::Residential,
            location: "Lekki, Lagos".to_string(),
            beds: Some(2),
            baths: Some(2),
            sqft: Some(1100),
            images: None,
            amenities: None,
            agent_id: None,
            contact: ContactDto {
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                phone: "08012345678".to_string(),
            },
        }
    }

    #[test]
    fn valid_listing_passes() {
        assert!(create_dto().validate().is_ok());
    }

    #[test]
    fn short_title_is_rejected() {
        let mut dto = create_dto();
        dto.title = "ab".to_string();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn negative_price_is_rejected() {
        let mut dto = create_dto();
        dto.price = -1;
        assert!(dto.validate().is_err());
    }

    #[test]
    fn nested_contact_is_validated() {
        let mut dto = create_dto();
        dto.contact.email = "not-an-email".to_string();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn submission_drops_client_supplied_status_and_verified() {
        let mut raw = serde_json::to_value(create_dto()).unwrap();
        raw["status"] = serde_json::json!("approved");
        raw["verified"] = serde_json::json!(true);

        let dto = serde_json::from_value::<CreatePropertyDto>(raw).unwrap();
        assert!(dto.validate().is_ok());

        let round_trip = serde_json::to_value(dto).unwrap();
        assert!(round_trip.get("status").is_none());
        assert!(round_trip.get("verified").is_none());
    }

    #[test]
    fn update_drops_a_client_supplied_owner() {
        let raw = serde_json::json!({
            "title": "Renamed listing",
            "ownerId": "c0ffee00-0000-0000-0000-000000000000",
        });

        let dto = serde_json::from_value::<UpdatePropertyDto>(raw).unwrap();
        let changes = dto.into_changes();
        assert_eq!(changes.title.as_deref(), Some("Renamed listing"));
    }
}
