use async_trait::async_trait;
use sqlx::{types::Json, QueryBuilder};
use uuid::Uuid;

use super::db::DBClient;

use crate::{
    dtos::propertydtos::CreatePropertyDto,
    models::propertymodel::{ListingType, Property, PropertyCategory, PropertyStatus},
    service::moderation::ModerationUpdate,
};

/// Search filters for the public catalogue. Only approved listings are
/// ever returned through that path.
#[derive(Debug, Default, Clone)]
pub struct PropertySearchFilters {
    pub location: Option<String>,
    pub listing_type: Option<ListingType>,
    pub category: Option<PropertyCategory>,
    pub min_beds: Option<i32>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
}

/// Non-privileged fields an owner may edit on their listing. Status,
/// verification and ownership never travel through here.
#[derive(Debug, Default, Clone)]
pub struct PropertyChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub price_usd: Option<i64>,
    pub listing_type: Option<ListingType>,
    pub category: Option<PropertyCategory>,
    pub location: Option<String>,
    pub beds: Option<i32>,
    pub baths: Option<i32>,
    pub sqft: Option<i32>,
    pub images: Option<Vec<String>>,
    pub amenities: Option<Vec<String>>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
}

impl PropertyChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.price_usd.is_none()
            && self.listing_type.is_none()
            && self.category.is_none()
            && self.location.is_none()
            && self.beds.is_none()
            && self.baths.is_none()
            && self.sqft.is_none()
            && self.images.is_none()
            && self.amenities.is_none()
            && self.contact_name.is_none()
            && self.contact_email.is_none()
            && self.contact_phone.is_none()
    }
}

#[async_trait]
pub trait PropertyExt {
    async fn create_property(
        &self,
        owner_id: Uuid,
        property_data: CreatePropertyDto,
    ) -> Result<Property, sqlx::Error>;

    async fn get_property_by_id(
        &self,
        property_id: Uuid,
    ) -> Result<Option<Property>, sqlx::Error>;

    /// Fetches a listing and bumps its view counter in one statement.
    async fn view_property(
        &self,
        property_id: Uuid,
    ) -> Result<Option<Property>, sqlx::Error>;

    async fn get_public_properties(
        &self,
        filters: PropertySearchFilters,
        page: u32,
        limit: usize,
    ) -> Result<(Vec<Property>, i64), sqlx::Error>;

    async fn get_properties_by_owner(
        &self,
        owner_id: Uuid,
        status: Option<PropertyStatus>,
        page: u32,
        limit: usize,
    ) -> Result<Vec<Property>, sqlx::Error>;

    async fn get_all_properties(
        &self,
        status: Option<PropertyStatus>,
        search: Option<&str>,
        page: u32,
        limit: usize,
    ) -> Result<(Vec<Property>, i64), sqlx::Error>;

    async fn update_property(
        &self,
        property_id: Uuid,
        changes: PropertyChanges,
    ) -> Result<Option<Property>, sqlx::Error>;

    async fn apply_moderation(
        &self,
        property_id: Uuid,
        admin_id: Uuid,
        update: ModerationUpdate,
    ) -> Result<Option<Property>, sqlx::Error>;

    async fn set_property_verified(
        &self,
        property_id: Uuid,
        verified: bool,
    ) -> Result<Option<Property>, sqlx::Error>;

    async fn delete_property(&self, property_id: Uuid) -> Result<u64, sqlx::Error>;
}

#[async_trait]
impl PropertyExt for DBClient {
    async fn create_property(
        &self,
        owner_id: Uuid,
        property_data: CreatePropertyDto,
    ) -> Result<Property, sqlx::Error> {
        sqlx::query_as::<_, Property>(
            r#"
            INSERT INTO properties (
                owner_id, agent_id, title, description, price, price_usd,
                listing_type, category, location, beds, baths, sqft,
                images, amenities, contact_name, contact_email, contact_phone
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12,
                $13, $14, $15, $16, $17
            )
            RETURNING *
            "#,
        )
        .bind(owner_id)
        .bind(property_data.agent_id)
        .bind(property_data.title)
        .bind(property_data.description)
        .bind(property_data.price)
        .bind(property_data.price_usd)
        .bind(property_data.listing_type)
        .bind(property_data.category)
        .bind(property_data.location)
        .bind(property_data.beds)
        .bind(property_data.baths)
        .bind(property_data.sqft)
        .bind(Json(property_data.images.unwrap_or_default()))
        .bind(Json(property_data.amenities.unwrap_or_default()))
        .bind(property_data.contact.name)
        .bind(property_data.contact.email)
        .bind(property_data.contact.phone)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_property_by_id(
        &self,
        property_id: Uuid,
    ) -> Result<Option<Property>, sqlx::Error> {
        sqlx::query_as::<_, Property>("SELECT * FROM properties WHERE id = $1")
            .bind(property_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn view_property(
        &self,
        property_id: Uuid,
    ) -> Result<Option<Property>, sqlx::Error> {
        sqlx::query_as::<_, Property>(
            r#"
            UPDATE properties
            SET views = views + 1
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(property_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_public_properties(
        &self,
        filters: PropertySearchFilters,
        page: u32,
        limit: usize,
    ) -> Result<(Vec<Property>, i64), sqlx::Error> {
        let offset = (page.max(1) - 1) as i64 * limit as i64;

        let push_filters = |builder: &mut QueryBuilder<sqlx::Postgres>| {
            builder.push(" WHERE status = ").push_bind(PropertyStatus::Approved);
            if let Some(location) = &filters.location {
                builder
                    .push(" AND location ILIKE ")
                    .push_bind(format!("%{}%", location));
            }
            if let Some(listing_type) = filters.listing_type {
                builder.push(" AND listing_type = ").push_bind(listing_type);
            }
            if let Some(category) = filters.category {
                builder.push(" AND category = ").push_bind(category);
            }
            if let Some(min_beds) = filters.min_beds {
                builder.push(" AND beds >= ").push_bind(min_beds);
            }
            if let Some(min_price) = filters.min_price {
                builder.push(" AND price >= ").push_bind(min_price);
            }
            if let Some(max_price) = filters.max_price {
                builder.push(" AND price <= ").push_bind(max_price);
            }
        };

        let mut builder = QueryBuilder::new("SELECT * FROM properties");
        push_filters(&mut builder);
        builder
            .push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(limit as i64)
            .push(" OFFSET ")
            .push_bind(offset);

        let properties = builder
            .build_query_as::<Property>()
            .fetch_all(&self.pool)
            .await?;

        let mut count_builder = QueryBuilder::new("SELECT COUNT(*) FROM properties");
        push_filters(&mut count_builder);
        let total: (i64,) = count_builder
            .build_query_as()
            .fetch_one(&self.pool)
            .await?;

        Ok((properties, total.0))
    }

    async fn get_properties_by_owner(
        &self,
        owner_id: Uuid,
        status: Option<PropertyStatus>,
        page: u32,
        limit: usize,
    ) -> Result<Vec<Property>, sqlx::Error> {
        let offset = (page.max(1) - 1) as i64 * limit as i64;

        let mut builder = QueryBuilder::new("SELECT * FROM properties WHERE owner_id = ");
        builder.push_bind(owner_id);
        if let Some(status) = status {
            builder.push(" AND status = ").push_bind(status);
        }
        builder
            .push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(limit as i64)
            .push(" OFFSET ")
            .push_bind(offset);

        builder
            .build_query_as::<Property>()
            .fetch_all(&self.pool)
            .await
    }

    async fn get_all_properties(
        &self,
        status: Option<PropertyStatus>,
        search: Option<&str>,
        page: u32,
        limit: usize,
    ) -> Result<(Vec<Property>, i64), sqlx::Error> {
        let offset = (page.max(1) - 1) as i64 * limit as i64;

        let push_filters = |builder: &mut QueryBuilder<sqlx::Postgres>| {
            builder.push(" WHERE TRUE");
            if let Some(status) = status {
                builder.push(" AND status = ").push_bind(status);
            }
            if let Some(search) = search {
                builder
                    .push(" AND (title ILIKE ")
                    .push_bind(format!("%{}%", search))
                    .push(" OR location ILIKE ")
                    .push_bind(format!("%{}%", search))
                    .push(")");
            }
        };

        let mut builder = QueryBuilder::new("SELECT * FROM properties");
        push_filters(&mut builder);
        builder
            .push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(limit as i64)
            .push(" OFFSET ")
            .push_bind(offset);

        let properties = builder
            .build_query_as::<Property>()
            .fetch_all(&self.pool)
            .await?;

        let mut count_builder = QueryBuilder::new("SELECT COUNT(*) FROM properties");
        push_filters(&mut count_builder);
        let total: (i64,) = count_builder
            .build_query_as()
            .fetch_one(&self.pool)
            .await?;

        Ok((properties, total.0))
    }

    async fn update_property(
        &self,
        property_id: Uuid,
        changes: PropertyChanges,
    ) -> Result<Option<Property>, sqlx::Error> {
        if changes.is_empty() {
            return self.get_property_by_id(property_id).await;
        }

        let mut builder = QueryBuilder::new("UPDATE properties SET ");
        let mut assignments = builder.separated(", ");

        if let Some(title) = changes.title {
            assignments.push("title = ").push_bind_unseparated(title);
        }
        if let Some(description) = changes.description {
            assignments
                .push("description = ")
                .push_bind_unseparated(description);
        }
        if let Some(price) = changes.price {
            assignments.push("price = ").push_bind_unseparated(price);
        }
        if let Some(price_usd) = changes.price_usd {
            assignments
                .push("price_usd = ")
                .push_bind_unseparated(price_usd);
        }
        if let Some(listing_type) = changes.listing_type {
            assignments
                .push("listing_type = ")
                .push_bind_unseparated(listing_type);
        }
        if let Some(category) = changes.category {
            assignments
                .push("category = ")
                .push_bind_unseparated(category);
        }
        if let Some(location) = changes.location {
            assignments
                .push("location = ")
                .push_bind_unseparated(location);
        }
        if let Some(beds) = changes.beds {
            assignments.push("beds = ").push_bind_unseparated(beds);
        }
        if let Some(baths) = changes.baths {
            assignments.push("baths = ").push_bind_unseparated(baths);
        }
        if let Some(sqft) = changes.sqft {
            assignments.push("sqft = ").push_bind_unseparated(sqft);
        }
        if let Some(images) = changes.images {
            assignments.push("images = ").push_bind_unseparated(Json(images));
        }
        if let Some(amenities) = changes.amenities {
            assignments
                .push("amenities = ")
                .push_bind_unseparated(Json(amenities));
        }
        if let Some(contact_name) = changes.contact_name {
            assignments
                .push("contact_name = ")
                .push_bind_unseparated(contact_name);
        }
        if let Some(contact_email) = changes.contact_email {
            assignments
                .push("contact_email = ")
                .push_bind_unseparated(contact_email);
        }
        if let Some(contact_phone) = changes.contact_phone {
            assignments
                .push("contact_phone = ")
                .push_bind_unseparated(contact_phone);
        }
        assignments.push("updated_at = NOW()");

        builder
            .push(" WHERE id = ")
            .push_bind(property_id)
            .push(" RETURNING *");

        builder
            .build_query_as::<Property>()
            .fetch_optional(&self.pool)
            .await
    }

    async fn apply_moderation(
        &self,
        property_id: Uuid,
        admin_id: Uuid,
        update: ModerationUpdate,
    ) -> Result<Option<Property>, sqlx::Error> {
        sqlx::query_as::<_, Property>(
            r#"
            UPDATE properties
            SET status = $1,
                rejection_reason = $2,
                approved_at = CASE
                    WHEN $3 THEN NOW()
                    WHEN $4 THEN NULL
                    ELSE approved_at
                END,
                approved_by = CASE
                    WHEN $3 THEN $5
                    WHEN $4 THEN NULL
                    ELSE approved_by
                END,
                updated_at = NOW()
            WHERE id = $6
            RETURNING *
            "#,
        )
        .bind(update.status)
        .bind(update.rejection_reason)
        .bind(update.stamp_approval)
        .bind(update.clear_approval)
        .bind(admin_id)
        .bind(property_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn set_property_verified(
        &self,
        property_id: Uuid,
        verified: bool,
    ) -> Result<Option<Property>, sqlx::Error> {
        sqlx::query_as::<_, Property>(
            r#"
            UPDATE properties
            SET verified = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING *
            "#,
        )
        .bind(verified)
        .bind(property_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete_property(&self, property_id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM properties WHERE id = $1")
            .bind(property_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
