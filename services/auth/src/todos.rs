//! Ownership gate placed in front of every todo read, update and delete
//!
//! The denial policy is chosen once per gate. With
//! [`DenialPolicy::NotFound`] a caller probing another user's todo gets the
//! same answer as for an id that does not exist, so todo ids leak nothing.
//! [`DenialPolicy::Forbidden`] reports the denial explicitly instead.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::config::AuthConfig;
use crate::error::{AuthError, AuthResult};
use crate::guard::{Access, AuthorizationGuard};
use crate::models::{TodoId, UserId};
use crate::store::{TodoOwnership, with_deadline};

/// How a cross-tenant access attempt is reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DenialPolicy {
    /// Answer as if the todo did not exist
    #[default]
    NotFound,
    /// Answer with an explicit forbidden error
    Forbidden,
}

impl FromStr for DenialPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "not_found" | "404" => Ok(DenialPolicy::NotFound),
            "forbidden" | "403" => Ok(DenialPolicy::Forbidden),
            other => Err(format!("unknown ownership denial policy: {}", other)),
        }
    }
}

impl DenialPolicy {
    fn deny(self) -> AuthError {
        match self {
            DenialPolicy::NotFound => AuthError::NotFound("todo"),
            DenialPolicy::Forbidden => AuthError::Forbidden,
        }
    }
}

/// Authenticates the caller and checks todo ownership
#[derive(Clone)]
pub struct TodoGate {
    guard: AuthorizationGuard,
    todos: Arc<dyn TodoOwnership>,
    policy: DenialPolicy,
    storage_timeout: Duration,
}

impl TodoGate {
    pub fn new(
        guard: AuthorizationGuard,
        todos: Arc<dyn TodoOwnership>,
        policy: DenialPolicy,
        storage_timeout: Duration,
    ) -> Self {
        Self {
            guard,
            todos,
            policy,
            storage_timeout,
        }
    }

    /// Build a gate with the configured denial policy and storage deadline
    pub fn from_config(
        config: &AuthConfig,
        guard: AuthorizationGuard,
        todos: Arc<dyn TodoOwnership>,
    ) -> Self {
        Self::new(
            guard,
            todos,
            config.ownership_denial,
            config.storage_timeout,
        )
    }

    /// Authenticate only. For listing and creating, which are scoped to the
    /// caller's own identity.
    pub fn authenticate(&self, token: Option<&str>) -> AuthResult<UserId> {
        self.guard.authenticate(token)
    }

    /// Authenticate the caller and require ownership of `todo_id`.
    ///
    /// Returns the caller's identity on success.
    pub async fn authorize(&self, token: Option<&str>, todo_id: TodoId) -> AuthResult<UserId> {
        let user_id = self.guard.authenticate(token)?;

        let owner = with_deadline(
            self.storage_timeout,
            "find_todo_owner",
            self.todos.find_todo_owner(todo_id),
        )
        .await?
        .ok_or(AuthError::NotFound("todo"))?;

        match self.guard.authorize_ownership(user_id, owner) {
            Access::Allow => Ok(user_id),
            Access::Deny => {
                info!("User {} denied access to todo {}", user_id, todo_id);
                Err(self.policy.deny())
            }
        }
    }
}
