//! Todo ownership lookups

use async_trait::async_trait;
use common::error::DatabaseError;
use sqlx::PgPool;

use crate::error::StoreError;
use crate::models::{TodoId, UserId};
use crate::store::TodoOwnership;

/// PostgreSQL todo owner lookup over `todos.user_id`.
#[derive(Clone)]
pub struct TodoRepository {
    pool: PgPool,
}

impl TodoRepository {
    /// Create a new todo repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TodoOwnership for TodoRepository {
    async fn find_todo_owner(&self, todo_id: TodoId) -> Result<Option<UserId>, StoreError> {
        let owner = sqlx::query_scalar::<_, i64>("SELECT user_id FROM todos WHERE id = $1")
            .bind(todo_id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::from)?;

        Ok(owner.map(UserId))
    }
}
