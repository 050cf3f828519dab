//! Storage ports consumed by the authentication core
//!
//! Adapters live in [`crate::repositories`]. The core holds them as
//! `Arc<dyn ...>` and bounds every call with a deadline.

use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use tracing::{error, warn};

use crate::error::{AuthError, AuthResult, StoreError};
use crate::models::{NewUser, TodoId, UserId, UserRecord};

/// Persistence of user identity records.
///
/// Implementations must enforce email uniqueness atomically: of two
/// concurrent inserts with the same email exactly one succeeds and the other
/// returns [`StoreError::Conflict`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Fetch a user by normalised email.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Insert a user and return its assigned identity.
    async fn insert_user(&self, user: &NewUser) -> Result<UserId, StoreError>;
}

/// Lookup of the owner recorded for a todo item.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TodoOwnership: Send + Sync {
    /// Owner of `todo_id`, or `None` if no such item exists.
    async fn find_todo_owner(&self, todo_id: TodoId) -> Result<Option<UserId>, StoreError>;
}

/// Run a storage call under `timeout` and translate its failure into the
/// core taxonomy. Adapter detail is logged here and dropped.
pub(crate) async fn with_deadline<T, F>(
    timeout: Duration,
    operation: &'static str,
    call: F,
) -> AuthResult<T>
where
    F: Future<Output = Result<T, StoreError>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(StoreError::Conflict)) => Err(AuthError::Conflict),
        Ok(Err(StoreError::Unavailable(detail))) => {
            error!("Storage call {} failed: {}", operation, detail);
            Err(AuthError::StorageUnavailable)
        }
        Err(_) => {
            warn!(
                "Storage call {} exceeded its {}ms deadline",
                operation,
                timeout.as_millis()
            );
            Err(AuthError::StorageUnavailable)
        }
    }
}
