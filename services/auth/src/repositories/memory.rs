//! In-process store for development and tests
//!
//! Implements both storage ports behind one lock, so the email uniqueness
//! check and the insert happen atomically.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

use crate::error::StoreError;
use crate::models::{NewUser, TodoId, UserId, UserRecord};
use crate::store::{CredentialStore, TodoOwnership};

#[derive(Debug, Default)]
struct Tables {
    /// Users keyed by email
    users: HashMap<String, UserRecord>,
    todos: HashMap<TodoId, UserId>,
    last_user_id: i64,
    last_todo_id: i64,
}

/// Store kept entirely in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a todo owned by `owner` and return its id
    pub async fn add_todo(&self, owner: UserId) -> TodoId {
        let mut tables = self.tables.lock().await;
        tables.last_todo_id += 1;
        let id = TodoId(tables.last_todo_id);
        tables.todos.insert(id, owner);
        id
    }

    /// Number of users stored under `email`
    pub async fn count_email(&self, email: &str) -> usize {
        let tables = self.tables.lock().await;
        tables.users.values().filter(|u| u.email == email).count()
    }

    /// Number of users stored
    pub async fn user_count(&self) -> usize {
        self.tables.lock().await.users.len()
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables.users.get(email).cloned())
    }

    async fn insert_user(&self, user: &NewUser) -> Result<UserId, StoreError> {
        let mut tables = self.tables.lock().await;
        if tables.users.contains_key(&user.email) {
            return Err(StoreError::Conflict);
        }

        tables.last_user_id += 1;
        let id = UserId(tables.last_user_id);
        tables.users.insert(
            user.email.clone(),
            UserRecord {
                id,
                name: user.name.clone(),
                email: user.email.clone(),
                password_hash: user.password_hash.clone(),
            },
        );
        Ok(id)
    }
}

#[async_trait]
impl TodoOwnership for MemoryStore {
    async fn find_todo_owner(&self, todo_id: TodoId) -> Result<Option<UserId>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables.todos.get(&todo_id).copied())
    }
}
