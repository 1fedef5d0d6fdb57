use uuid::Uuid;

use crate::{
    error::{ErrorMessage, HttpError},
    models::usermodel::{User, UserRole},
};

/// Admin-only actions: moderation, role assignment, user deletion, the
/// all-records listings.
pub fn require_admin(user: &User) -> Result<(), HttpError> {
    if user.role != UserRole::Admin {
        return Err(HttpError::forbidden(ErrorMessage::PermissionDenied.to_string()));
    }
    Ok(())
}

/// Ownership check with the admin override that applies to every owned
/// resource (properties, profiles, bookings).
pub fn require_owner_or_admin(user: &User, owner_id: Uuid) -> Result<(), HttpError> {
    if user.id == owner_id || user.role == UserRole::Admin {
        return Ok(());
    }
    Err(HttpError::forbidden(ErrorMessage::PermissionDenied.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use chrono::Utc;

    fn user_with_role(role: UserRole) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            password: "hashed".to_string(),
            role,
            approved: true,
            suspended_at: None,
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
    fn admin_passes_admin_check() {
        assert!(require_admin(&user_with_role(UserRole::Admin)).is_ok());
    }

    #[test]
    fn non_admin_roles_are_forbidden() {
        for role in [UserRole::User, UserRole::Agent, UserRole::Investor] {
            let err = require_admin(&user_with_role(role)).unwrap_err();
            assert_eq!(err.status, StatusCode::FORBIDDEN);
        }
    }

    #[test]
    fn owner_may_touch_own_resource() {
        let user = user_with_role(UserRole::User);
        assert!(require_owner_or_admin(&user, user.id).is_ok());
    }

    #[test]
    fn admin_overrides_ownership() {
        let admin = user_with_role(UserRole::Admin);
        assert!(require_owner_or_admin(&admin, Uuid::new_v4()).is_ok());
    }

    #[test]
    fn stranger_is_forbidden() {
        let user = user_with_role(UserRole::User);
        let err = require_owner_or_admin(&user, Uuid::new_v4()).unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
    }
}
