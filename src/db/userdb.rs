use async_trait::async_trait;
use sqlx::QueryBuilder;
use uuid::Uuid;

use super::db::DBClient;

use crate::models::{
    propertymodel::Property,
    usermodel::{User, UserRole},
};

const USER_COLUMNS: &str = r#"
    id, name, email, password, role, approved, suspended_at,
    phone, bio, company, specialization, location, avatar_url,
    created_at, updated_at
"#;

/// Profile fields a user may change about themselves. Role, approval and
/// suspension are deliberately absent; those only move through the admin
/// operations below.
#[derive(Debug, Default, Clone)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub company: Option<String>,
    pub specialization: Option<String>,
    pub location: Option<String>,
    pub avatar_url: Option<String>,
}

impl ProfileChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.phone.is_none()
            && self.bio.is_none()
            && self.company.is_none()
            && self.specialization.is_none()
            && self.location.is_none()
            && self.avatar_url.is_none()
    }
}

#[async_trait]
pub trait UserExt {
    async fn get_user(
        &self,
        user_id: Option<Uuid>,
        email: Option<&str>,
    ) -> Result<Option<User>, sqlx::Error>;

    async fn get_users(
        &self,
        search: Option<&str>,
        role: Option<UserRole>,
        page: u32,
        limit: usize,
    ) -> Result<Vec<User>, sqlx::Error>;

    async fn get_user_count(
        &self,
        search: Option<&str>,
        role: Option<UserRole>,
    ) -> Result<i64, sqlx::Error>;

    async fn save_user<T: Into<String> + Send>(
        &self,
        name: T,
        email: T,
        password: T,
    ) -> Result<User, sqlx::Error>;

    async fn update_user_profile(
        &self,
        user_id: Uuid,
        changes: ProfileChanges,
    ) -> Result<Option<User>, sqlx::Error>;

    async fn update_user_role(
        &self,
        user_id: Uuid,
        role: UserRole,
    ) -> Result<Option<User>, sqlx::Error>;

    async fn set_user_approval(
        &self,
        user_id: Uuid,
        approved: bool,
    ) -> Result<Option<User>, sqlx::Error>;

    async fn set_user_suspension(
        &self,
        user_id: Uuid,
        suspended: bool,
    ) -> Result<Option<User>, sqlx::Error>;

    async fn delete_user(&self, user_id: Uuid) -> Result<u64, sqlx::Error>;

    async fn count_admins(&self) -> Result<i64, sqlx::Error>;

    async fn add_favorite(
        &self,
        user_id: Uuid,
        property_id: Uuid,
    ) -> Result<bool, sqlx::Error>;

    async fn remove_favorite(
        &self,
        user_id: Uuid,
        property_id: Uuid,
    ) -> Result<bool, sqlx::Error>;

    async fn get_favorite_properties(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<Property>, sqlx::Error>;
}

fn push_user_filters<'a>(
    builder: &mut QueryBuilder<'a, sqlx::Postgres>,
    search: Option<&'a str>,
    role: Option<UserRole>,
) {
    if let Some(search) = search {
        builder
            .push(" AND (name ILIKE ")
            .push_bind(format!("%{}%", search))
            .push(" OR email ILIKE ")
            .push_bind(format!("%{}%", search))
            .push(")");
    }
    if let Some(role) = role {
        builder.push(" AND role = ").push_bind(role);
    }
}

#[async_trait]
impl UserExt for DBClient {
    async fn get_user(
        &self,
        user_id: Option<Uuid>,
        email: Option<&str>,
    ) -> Result<Option<User>, sqlx::Error> {
        let mut user: Option<User> = None;

        if let Some(user_id) = user_id {
            user = sqlx::query_as::<_, User>(&format!(
                "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
            ))
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        } else if let Some(email) = email {
            user = sqlx::query_as::<_, User>(&format!(
                "SELECT {USER_COLUMNS} FROM users WHERE email = LOWER($1)"
            ))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        }

        Ok(user)
    }

    async fn get_users(
        &self,
        search: Option<&str>,
        role: Option<UserRole>,
        page: u32,
        limit: usize,
    ) -> Result<Vec<User>, sqlx::Error> {
        let offset = (page.max(1) - 1) as i64 * limit as i64;

        let mut builder = QueryBuilder::new(format!(
            "SELECT {USER_COLUMNS} FROM users WHERE TRUE"
        ));
        push_user_filters(&mut builder, search, role);
        builder
            .push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(limit as i64)
            .push(" OFFSET ")
            .push_bind(offset);

        builder.build_query_as::<User>().fetch_all(&self.pool).await
    }

    async fn get_user_count(
        &self,
        search: Option<&str>,
        role: Option<UserRole>,
    ) -> Result<i64, sqlx::Error> {
        let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM users WHERE TRUE");
        push_user_filters(&mut builder, search, role);

        let count: (i64,) = builder.build_query_as().fetch_one(&self.pool).await?;
        Ok(count.0)
    }

    async fn save_user<T: Into<String> + Send>(
        &self,
        name: T,
        email: T,
        password: T,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (name, email, password)
            VALUES ($1, LOWER($2), $3)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(name.into())
        .bind(email.into())
        .bind(password.into())
        .fetch_one(&self.pool)
        .await
    }

    async fn update_user_profile(
        &self,
        user_id: Uuid,
        changes: ProfileChanges,
    ) -> Result<Option<User>, sqlx::Error> {
        if changes.is_empty() {
            return self.get_user(Some(user_id), None).await;
        }

        let mut builder = QueryBuilder::new("UPDATE users SET ");
        let mut assignments = builder.separated(", ");

        if let Some(name) = changes.name {
            assignments.push("name = ").push_bind_unseparated(name);
        }
        if let Some(phone) = changes.phone {
            assignments.push("phone = ").push_bind_unseparated(phone);
        }
        if let Some(bio) = changes.bio {
            assignments.push("bio = ").push_bind_unseparated(bio);
        }
        if let Some(company) = changes.company {
            assignments.push("company = ").push_bind_unseparated(company);
        }
        if let Some(specialization) = changes.specialization {
            assignments
                .push("specialization = ")
                .push_bind_unseparated(specialization);
        }
        if let Some(location) = changes.location {
            assignments.push("location = ").push_bind_unseparated(location);
        }
        if let Some(avatar_url) = changes.avatar_url {
            assignments
                .push("avatar_url = ")
                .push_bind_unseparated(avatar_url);
        }
        assignments.push("updated_at = NOW()");

        builder
            .push(" WHERE id = ")
            .push_bind(user_id)
            .push(format!(" RETURNING {USER_COLUMNS}"));

        builder
            .build_query_as::<User>()
            .fetch_optional(&self.pool)
            .await
    }

    async fn update_user_role(
        &self,
        user_id: Uuid,
        role: UserRole,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET role = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(role)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn set_user_approval(
        &self,
        user_id: Uuid,
        approved: bool,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET approved = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(approved)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn set_user_suspension(
        &self,
        user_id: Uuid,
        suspended: bool,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET suspended_at = CASE WHEN $1 THEN NOW() ELSE NULL END,
                updated_at = NOW()
            WHERE id = $2
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(suspended)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete_user(&self, user_id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn count_admins(&self) -> Result<i64, sqlx::Error> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM users WHERE role = 'admin'")
                .fetch_one(&self.pool)
                .await?;
        Ok(count.0)
    }

    async fn add_favorite(
        &self,
        user_id: Uuid,
        property_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO favorites (user_id, property_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, property_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(property_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if inserted > 0 {
            sqlx::query(
                "UPDATE properties SET favorites = favorites + 1 WHERE id = $1",
            )
            .bind(property_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(inserted > 0)
    }

    async fn remove_favorite(
        &self,
        user_id: Uuid,
        property_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let removed = sqlx::query(
            "DELETE FROM favorites WHERE user_id = $1 AND property_id = $2",
        )
        .bind(user_id)
        .bind(property_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if removed > 0 {
            sqlx::query(
                "UPDATE properties SET favorites = GREATEST(favorites - 1, 0) WHERE id = $1",
            )
            .bind(property_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(removed > 0)
    }

    async fn get_favorite_properties(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<Property>, sqlx::Error> {
        sqlx::query_as::<_, Property>(
            r#"
            SELECT p.*
            FROM properties p
            INNER JOIN favorites f ON f.property_id = p.id
            WHERE f.user_id = $1
            ORDER BY f.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }
}
