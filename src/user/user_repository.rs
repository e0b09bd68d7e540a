use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::user_models::{Course, User, UserRole};
use crate::error::{AppError, Result};

const UNIQUE_VIOLATION: &str = "23505";

/// Persistence port for accounts.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>>;

    /// Fails with [`AppError::Conflict`] when the email is already taken.
    async fn create(&self, name: &str, email: &str, password_hash: &str) -> Result<User>;

    /// Sets name and photo; returns `None` if the account no longer exists.
    async fn update_profile(
        &self,
        user_id: Uuid,
        name: &str,
        photo_url: Option<&str>,
    ) -> Result<Option<User>>;

    /// Enrolled courses in enrollment order.
    async fn enrolled_courses(&self, user_id: Uuid) -> Result<Vec<Course>>;
}

#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn create(&self, name: &str, email: &str, password_hash: &str) -> Result<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (name, email, password_hash, role) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(UserRole::Student.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) =>
            {
                AppError::Conflict("User already exists.".to_string())
            }
            other => AppError::Database(other),
        })
    }

    async fn update_profile(
        &self,
        user_id: Uuid,
        name: &str,
        photo_url: Option<&str>,
    ) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET name = $2, photo_url = $3, updated_at = NOW()
             WHERE id = $1
             RETURNING *",
        )
        .bind(user_id)
        .bind(name)
        .bind(photo_url)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn enrolled_courses(&self, user_id: Uuid) -> Result<Vec<Course>> {
        let courses = sqlx::query_as::<_, Course>(
            "SELECT c.id, c.course_title, c.sub_title, c.category, c.course_thumbnail,
                    c.is_published, c.creator_id, c.created_at
             FROM user_enrolled_courses e
             JOIN courses c ON c.id = e.course_id
             WHERE e.user_id = $1
             ORDER BY e.enrolled_at, c.id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(courses)
    }
}
