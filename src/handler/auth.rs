use std::sync::Arc;

use axum::{
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
    Extension, Json, Router,
};
use axum_extra::extract::cookie::Cookie;
use validator::Validate;

use crate::{
    db::userdb::UserExt,
    dtos::userdtos::{
        FilterUserDto, LoginUserDto, RegisterUserDto, Response, UserData, UserLoginResponseDto,
        UserResponseDto,
    },
    error::{ErrorMessage, HttpError},
    models::usermodel::User,
    utils::{password, token},
    AppState,
};

pub fn auth_handler() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
}

pub async fn register(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<RegisterUserDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let existing_user = app_state
        .db_client
        .get_user(None, Some(&body.email))
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    if existing_user.is_some() {
        return Err(HttpError::conflict(ErrorMessage::EmailExist.to_string()));
    }

    let hashed_password =
        password::hash(&body.password).map_err(|e| HttpError::server_error(e.to_string()))?;

    let user = app_state
        .db_client
        .save_user(body.name, body.email, hashed_password)
        .await
        .map_err(|e| match e {
            // Unique index on lower(email) closes the check-then-insert race.
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                HttpError::conflict(ErrorMessage::EmailExist.to_string())
            }
            _ => HttpError::server_error(e.to_string()),
        })?;

    let filtered_user = FilterUserDto::filter_user(&user);

    // No token here: the account still needs admin approval before login.
    Ok((
        StatusCode::CREATED,
        Json(UserResponseDto {
            status: "success".to_string(),
            data: UserData {
                user: filtered_user,
            },
        }),
    ))
}

/// Session cookie carrying the token. jwt_maxage is already in minutes,
/// so the cookie expires together with the token.
fn session_cookie(token: String, maxage_minutes: i64) -> Cookie<'static> {
    Cookie::build(("token", token))
        .path("/")
        .max_age(time::Duration::minutes(maxage_minutes))
        .http_only(true)
        .build()
}

/// Post-credential account gates. Suspension wins over pending approval,
/// and both apply even when the password was correct.
fn ensure_account_active(user: &User) -> Result<(), HttpError> {
    if user.suspended_at.is_some() {
        return Err(HttpError::forbidden(
            ErrorMessage::AccountSuspended.to_string(),
        ));
    }

    if !user.approved {
        return Err(HttpError::forbidden(
            ErrorMessage::AccountPendingApproval.to_string(),
        ));
    }

    Ok(())
}

pub async fn login(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<LoginUserDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let result = app_state
        .db_client
        .get_user(None, Some(&body.email))
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    // Same message for unknown email and wrong password.
    let user = result.ok_or(HttpError::unauthorized(
        ErrorMessage::WrongCredentials.to_string(),
    ))?;

    let password_matched = password::compare(&body.password, &user.password)
        .map_err(|_| HttpError::unauthorized(ErrorMessage::WrongCredentials.to_string()))?;

    if !password_matched {
        return Err(HttpError::unauthorized(
            ErrorMessage::WrongCredentials.to_string(),
        ));
    }

    ensure_account_active(&user)?;

    let token = token::create_token(
        &user.id.to_string(),
        &user.email,
        user.role,
        app_state.env.jwt_secret.as_bytes(),
        app_state.env.jwt_maxage,
    )
    .map_err(|e| HttpError::server_error(e.to_string()))?;

    let cookie = session_cookie(token.clone(), app_state.env.jwt_maxage);

    let response = Json(UserLoginResponseDto {
        status: "success".to_string(),
        token,
    });

    let mut headers = HeaderMap::new();
    headers.append(
        header::SET_COOKIE,
        cookie
            .to_string()
            .parse()
            .map_err(|_| HttpError::server_error("Failed to build session cookie"))?,
    );

    let mut response = response.into_response();
    response.headers_mut().extend(headers);

    Ok(response)
}

pub async fn logout() -> Result<impl IntoResponse, HttpError> {
    let cookie = Cookie::build(("token", ""))
        .path("/")
        .max_age(time::Duration::minutes(-1))
        .http_only(true)
        .build();

    let mut headers = HeaderMap::new();
    headers.append(
        header::SET_COOKIE,
        cookie
            .to_string()
            .parse()
            .map_err(|_| HttpError::server_error("Failed to build session cookie"))?,
    );

    let mut response = Json(Response {
        status: "success",
        message: "Logged out".to_string(),
    })
    .into_response();
    response.headers_mut().extend(headers);

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use chrono::Utc;
    use uuid::Uuid;

    use crate::models::usermodel::UserRole;

    fn account(approved: bool, suspended: bool) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            password: "hashed".to_string(),
            role: UserRole::User,
            approved,
            suspended_at: suspended.then(Utc::now),
            phone: None,
            bio: None,
            company: None,
            specialization: None,
            location: None,
            avatar_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn session_cookie_lives_as_long_as_the_token() {
        let cookie = session_cookie("abc".to_string(), 1440);
        assert_eq!(cookie.max_age(), Some(time::Duration::minutes(1440)));
        assert_eq!(cookie.http_only(), Some(true));
    }

    #[test]
    fn approved_account_may_log_in() {
        assert!(ensure_account_active(&account(true, false)).is_ok());
    }

    #[test]
    fn unapproved_account_is_forbidden() {
        let err = ensure_account_active(&account(false, false)).unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
        assert_eq!(err.message, ErrorMessage::AccountPendingApproval.to_string());
    }

    #[test]
    fn suspended_account_is_forbidden_even_when_approved() {
        let err = ensure_account_active(&account(true, true)).unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
        assert_eq!(err.message, ErrorMessage::AccountSuspended.to_string());
    }

    #[test]
    fn suspension_outranks_pending_approval() {
        let err = ensure_account_active(&account(false, true)).unwrap_err();
        assert_eq!(err.message, ErrorMessage::AccountSuspended.to_string());
    }
}
