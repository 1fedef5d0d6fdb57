use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    routing::{get, patch},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::userdb::UserExt,
    dtos::userdtos::{
        AdminUserUpdateDto, FilterUserDto, UpdateProfileDto, UserData, UserListQueryDto,
        UserListResponseDto, UserResponseDto,
    },
    error::{ErrorMessage, HttpError},
    middleware::JWTAuthMiddeware,
    models::usermodel::UserRole,
    service::access,
    AppState,
};

pub fn users_handler() -> Router {
    Router::new()
        .route("/me", get(get_me).put(update_me))
        .route("/favorites", get(get_favorites))
}

pub fn admin_users_handler() -> Router {
    Router::new()
        .route("/", get(admin_list_users))
        .route("/:user_id", patch(admin_update_user).delete(admin_delete_user))
}

pub async fn get_me(
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    Ok(Json(UserResponseDto {
        status: "success".to_string(),
        data: UserData {
            user: FilterUserDto::filter_user(&auth.user),
        },
    }))
}

pub async fn update_me(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(body): Json<UpdateProfileDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let user = app_state
        .db_client
        .update_user_profile(auth.user.id, body.into_changes())
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::unauthorized(ErrorMessage::UserNoLongerExist.to_string()))?;

    Ok(Json(UserResponseDto {
        status: "success".to_string(),
        data: UserData {
            user: FilterUserDto::filter_user(&user),
        },
    }))
}

pub async fn get_favorites(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let properties = app_state
        .db_client
        .get_favorite_properties(auth.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "results": properties.len(),
        "properties": properties,
    })))
}

pub async fn admin_list_users(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query_params): Query<UserListQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query_params
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let page = query_params.page.unwrap_or(1) as u32;
    let limit = query_params.limit.unwrap_or(10);

    let role = match query_params.role.as_deref() {
        Some(value) => Some(
            UserRole::from_str(value)
                .ok_or_else(|| HttpError::bad_request(format!("Invalid role '{}'", value)))?,
        ),
        None => None,
    };

    let users = app_state
        .db_client
        .get_users(query_params.search.as_deref(), role, page, limit)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let total = app_state
        .db_client
        .get_user_count(query_params.search.as_deref(), role)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(UserListResponseDto {
        status: "success".to_string(),
        users: FilterUserDto::filter_users(&users),
        results: total,
    }))
}

pub async fn admin_update_user(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(user_id): Path<Uuid>,
    Json(body): Json<AdminUserUpdateDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    // The route is already admin-gated; this repeats the check at the
    // handler boundary.
    access::require_admin(&auth.user)?;

    if user_id == auth.user.id {
        return Err(HttpError::forbidden(
            "Admins cannot modify their own account through this endpoint",
        ));
    }

    let mut user = app_state
        .db_client
        .get_user(Some(user_id), None)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("User not found"))?;

    if let Some(role) = body.role.as_deref() {
        let role = UserRole::from_str(role)
            .ok_or_else(|| HttpError::bad_request(format!("Invalid role '{}'", role)))?;

        if user.role == UserRole::Admin && role != UserRole::Admin {
            let admins = app_state
                .db_client
                .count_admins()
                .await
                .map_err(|e| HttpError::server_error(e.to_string()))?;
            if admins <= 1 {
                return Err(HttpError::forbidden("Cannot demote the last admin"));
            }
        }

        user = app_state
            .db_client
            .update_user_role(user_id, role)
            .await
            .map_err(|e| HttpError::server_error(e.to_string()))?
            .ok_or_else(|| HttpError::not_found("User not found"))?;
    }

    if let Some(approved) = body.approved {
        user = app_state
            .db_client
            .set_user_approval(user_id, approved)
            .await
            .map_err(|e| HttpError::server_error(e.to_string()))?
            .ok_or_else(|| HttpError::not_found("User not found"))?;
    }

    if let Some(suspended) = body.suspended {
        user = app_state
            .db_client
            .set_user_suspension(user_id, suspended)
            .await
            .map_err(|e| HttpError::server_error(e.to_string()))?
            .ok_or_else(|| HttpError::not_found("User not found"))?;
    }

    Ok(Json(UserResponseDto {
        status: "success".to_string(),
        data: UserData {
            user: FilterUserDto::filter_user(&user),
        },
    }))
}

pub async fn admin_delete_user(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    access::require_admin(&auth.user)?;

    if user_id == auth.user.id {
        return Err(HttpError::forbidden(
            "Admins cannot delete their own account",
        ));
    }

    let target = app_state
        .db_client
        .get_user(Some(user_id), None)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("User not found"))?;

    if target.role == UserRole::Admin {
        let admins = app_state
            .db_client
            .count_admins()
            .await
            .map_err(|e| HttpError::server_error(e.to_string()))?;
        if admins <= 1 {
            return Err(HttpError::forbidden("Cannot delete the last admin"));
        }
    }

    app_state
        .db_client
        .delete_user(user_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "message": "User deleted",
    })))
}
