use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{db::userdb::ProfileChanges, models::usermodel::User};

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct RegisterUserDto {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email is invalid")
    )]
    pub email: String,

    #[validate(
        length(min = 1, message = "Password is required"),
        length(min = 6, message = "Password must be at least 6 characters")
    )]
    pub password: String,

    #[validate(
        length(min = 1, message = "Confirm Password is required"),
        must_match(other = "password", message = "passwords do not match")
    )]
    #[serde(rename = "passwordConfirm")]
    pub password_confirm: String,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct LoginUserDto {
    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email is invalid")
    )]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Self-service profile update. Role, approval and suspension are not
/// representable here; a payload carrying them has those fields dropped
/// on deserialization, so they can never reach the merge.
#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct UpdateProfileDto {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,

    #[validate(length(min = 5, max = 20, message = "Phone must be between 5-20 characters"))]
    pub phone: Option<String>,

    #[validate(length(max = 1000, message = "Bio must be at most 1000 characters"))]
    pub bio: Option<String>,

    pub company: Option<String>,
    pub specialization: Option<String>,
    pub location: Option<String>,

    #[validate(url(message = "Avatar URL must be a valid URL"))]
    #[serde(rename = "avatarUrl")]
    pub avatar_url: Option<String>,
}

impl UpdateProfileDto {
    pub fn into_changes(self) -> ProfileChanges {
        ProfileChanges {
            name: self.name,
            phone: self.phone,
            bio: self.bio,
            company: self.company,
            specialization: self.specialization,
            location: self.location,
            avatar_url: self.avatar_url,
        }
    }
}

#[derive(Serialize, Deserialize, Validate)]
pub struct UserListQueryDto {
    #[validate(range(min = 1))]
    pub page: Option<usize>,
    #[validate(range(min = 1, max = 50))]
    pub limit: Option<usize>,
    pub search: Option<String>,
    pub role: Option<String>,
}

/// Admin-side account update. Any combination of the three fields may be
/// supplied.
#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct AdminUserUpdateDto {
    pub role: Option<String>,
    pub approved: Option<bool>,
    pub suspended: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FilterUserDto {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub approved: bool,
    pub suspended: bool,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub company: Option<String>,
    pub specialization: Option<String>,
    pub location: Option<String>,
    #[serde(rename = "avatarUrl")]
    pub avatar_url: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl FilterUserDto {
    pub fn filter_user(user: &User) -> Self {
        FilterUserDto {
            id: user.id.to_string(),
            name: user.name.to_owned(),
            email: user.email.to_owned(),
            role: user.role.to_str().to_string(),
            approved: user.approved,
            suspended: user.suspended_at.is_some(),
            phone: user.phone.clone(),
            bio: user.bio.clone(),
            company: user.company.clone(),
            specialization: user.specialization.clone(),
            location: user.location.clone(),
            avatar_url: user.avatar_url.clone(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }

    pub fn filter_users(users: &[User]) -> Vec<FilterUserDto> {
        users.iter().map(FilterUserDto::filter_user).collect()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserData {
    pub user: FilterUserDto,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponseDto {
    pub status: String,
    pub data: UserData,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserListResponseDto {
    pub status: String,
    pub users: Vec<FilterUserDto>,
    pub results: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserLoginResponseDto {
    pub status: String,
    pub token: String,
}

#[derive(Serialize, Deserialize)]
pub struct Response {
    pub status: &'static str,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_requires_matching_passwords() {
        let dto = RegisterUserDto {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "secret1".to_string(),
            password_confirm: "secret2".to_string(),
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn register_rejects_short_password() {
        let dto = RegisterUserDto {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "abc".to_string(),
            password_confirm: "abc".to_string(),
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn profile_update_drops_privileged_fields() {
        let raw = serde_json::json!({
            "bio": "hello",
            "role": "admin",
            "approved": true,
            "suspended": false,
        });

        let dto = serde_json::from_value::<UpdateProfileDto>(raw).unwrap();
        let changes = dto.into_changes();
        assert_eq!(changes.bio.as_deref(), Some("hello"));

        let round_trip = serde_json::to_value(UpdateProfileDto {
            bio: Some("hello".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert!(round_trip.get("role").is_none());
        assert!(round_trip.get("approved").is_none());
    }

    #[test]
    fn filter_user_never_exposes_the_password_hash() {
        let raw = serde_json::to_value(FilterUserDto {
            id: "x".to_string(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            role: "user".to_string(),
            approved: false,
            suspended: false,
            phone: None,
            bio: None,
            company: None,
            specialization: None,
            location: None,
            avatar_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
        .unwrap();
        assert!(raw.get("password").is_none());
    }
}
