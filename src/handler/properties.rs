use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, patch, post},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::propertydb::PropertyExt,
    db::userdb::UserExt,
    dtos::propertydtos::{
        AdminPropertyQueryDto, CreatePropertyDto, OwnerPropertyQueryDto, PropertyListQueryDto,
        PropertyListResponseDto, UpdatePropertyDto, UpdatePropertyStatusDto, VerifyPropertyDto,
    },
    error::HttpError,
    middleware::JWTAuthMiddeware,
    models::propertymodel::PropertyStatus,
    service::{access, moderation::ModerationUpdate},
    AppState,
};

/// Catalogue routes that require no session.
pub fn public_property_handler() -> Router {
    Router::new()
        .route("/", get(list_public_properties))
        .route("/:property_id", get(get_property))
}

/// Owner-facing routes, layered with auth in the router.
pub fn property_handler() -> Router {
    Router::new()
        .route("/", post(create_property))
        .route("/mine", get(my_properties))
        .route("/:property_id", patch(update_property).delete(delete_property))
        .route(
            "/:property_id/favorite",
            post(favorite_property).delete(unfavorite_property),
        )
}

pub fn admin_properties_handler() -> Router {
    Router::new()
        .route("/", get(admin_list_properties))
        .route("/:property_id/status", patch(admin_update_status))
        .route("/:property_id/verify", patch(admin_verify_property))
        .route("/:property_id", delete(admin_delete_property))
}

pub async fn create_property(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(body): Json<CreatePropertyDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    // Ownership comes from the session, never from the payload, and every
    // new listing starts pending.
    let property = app_state
        .db_client
        .create_property(auth.user.id, body)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "status": "success",
            "data": { "property": property },
        })),
    ))
}

pub async fn get_property(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(property_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let property = app_state
        .db_client
        .view_property(property_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Property not found"))?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": { "property": property },
    })))
}

pub async fn list_public_properties(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query_params): Query<PropertyListQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query_params
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let page = query_params.page.unwrap_or(1) as u32;
    let limit = query_params.limit.unwrap_or(10);

    let (properties, total) = app_state
        .db_client
        .get_public_properties(query_params.filters(), page, limit)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(PropertyListResponseDto {
        status: "success".to_string(),
        properties,
        results: total,
    }))
}

pub async fn my_properties(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Query(query_params): Query<OwnerPropertyQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query_params
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let status = parse_status_filter(query_params.status.as_deref())?;
    let page = query_params.page.unwrap_or(1) as u32;
    let limit = query_params.limit.unwrap_or(10);

    let properties = app_state
        .db_client
        .get_properties_by_owner(auth.user.id, status, page, limit)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "results": properties.len(),
        "properties": properties,
    })))
}

pub async fn update_property(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(property_id): Path<Uuid>,
    Json(body): Json<UpdatePropertyDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let property = app_state
        .db_client
        .get_property_by_id(property_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Property not found"))?;

    access::require_owner_or_admin(&auth.user, property.owner_id)?;

    let property = app_state
        .db_client
        .update_property(property_id, body.into_changes())
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Property not found"))?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": { "property": property },
    })))
}

pub async fn delete_property(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(property_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let property = app_state
        .db_client
        .get_property_by_id(property_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Property not found"))?;

    access::require_owner_or_admin(&auth.user, property.owner_id)?;

    app_state
        .db_client
        .delete_property(property_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "message": "Property deleted",
    })))
}

pub async fn favorite_property(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(property_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    app_state
        .db_client
        .get_property_by_id(property_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Property not found"))?;

    let added = app_state
        .db_client
        .add_favorite(auth.user.id, property_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "favorited": true,
        "changed": added,
    })))
}

pub async fn unfavorite_property(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(property_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    app_state
        .db_client
        .get_property_by_id(property_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Property not found"))?;

    let removed = app_state
        .db_client
        .remove_favorite(auth.user.id, property_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "favorited": false,
        "changed": removed,
    })))
}

pub async fn admin_list_properties(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query_params): Query<AdminPropertyQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query_params
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let status = parse_status_filter(query_params.status.as_deref())?;
    let page = query_params.page.unwrap_or(1) as u32;
    let limit = query_params.limit.unwrap_or(10);

    let (properties, total) = app_state
        .db_client
        .get_all_properties(status, query_params.search.as_deref(), page, limit)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(PropertyListResponseDto {
        status: "success".to_string(),
        properties,
        results: total,
    }))
}

pub async fn admin_update_status(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(property_id): Path<Uuid>,
    Json(body): Json<UpdatePropertyStatusDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    access::require_admin(&auth.user)?;

    let update = ModerationUpdate::resolve(&body.status, body.rejection_reason.as_deref())?;

    let property = app_state
        .db_client
        .apply_moderation(property_id, auth.user.id, update)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Property not found"))?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": { "property": property },
    })))
}

pub async fn admin_verify_property(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(property_id): Path<Uuid>,
    Json(body): Json<VerifyPropertyDto>,
) -> Result<impl IntoResponse, HttpError> {
    let property = app_state
        .db_client
        .set_property_verified(property_id, body.verified)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Property not found"))?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": { "property": property },
    })))
}

pub async fn admin_delete_property(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(property_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let deleted = app_state
        .db_client
        .delete_property(property_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    if deleted == 0 {
        return Err(HttpError::not_found("Property not found"));
    }

    Ok(Json(serde_json::json!({
        "status": "success",
        "message": "Property deleted",
    })))
}

fn parse_status_filter(status: Option<&str>) -> Result<Option<PropertyStatus>, HttpError> {
    match status {
        Some(value) => PropertyStatus::from_str(value)
            .map(Some)
            .ok_or_else(|| HttpError::bad_request(format!("Invalid status '{}'", value))),
        None => Ok(None),
    }
}
