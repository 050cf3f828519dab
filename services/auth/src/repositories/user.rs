//! User repository for database operations

use async_trait::async_trait;
use common::error::DatabaseError;
use sqlx::PgPool;
use tracing::debug;

use crate::error::StoreError;
use crate::models::{NewUser, UserId, UserRecord};
use crate::store::CredentialStore;

/// PostgreSQL credential store.
///
/// Relies on a `UNIQUE` constraint on `users.email`; a duplicate insert
/// surfaces as [`StoreError::Conflict`].
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for UserRepository {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        debug!("Finding user by email: {}", email);

        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, name, email, password_hash
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from)?;

        Ok(user)
    }

    async fn insert_user(&self, user: &NewUser) -> Result<UserId, StoreError> {
        debug!("Inserting user: {}", user.email);

        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from)?;

        Ok(UserId(id))
    }
}
