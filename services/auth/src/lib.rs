//! Authentication and authorization core for the task-list service
//!
//! - [`password::PasswordHasher`]: salted argon2id hashing and verification
//! - [`session::SessionIssuer`]: signed, expiring session tokens
//! - [`service::AuthService`]: sign-up and sign-in
//! - [`guard::AuthorizationGuard`]: token to user, plus ownership decisions
//! - [`todos::TodoGate`]: the ownership check applied before todo access
//!
//! Storage, clock and signing secret are injected; nothing here is global.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use auth::{AuthConfig, AuthService, TodoGate};
//! use auth::repositories::MemoryStore;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AuthConfig::from_env()?;
//! let store = Arc::new(MemoryStore::new());
//! let service = AuthService::from_config(&config, store.clone(), Arc::new(mockable::DefaultClock))?;
//!
//! service.sign_up("Alice", "a@x.com", "secret").await?;
//! let (_user, session) = service.sign_in("a@x.com", "secret").await?;
//!
//! let gate = TodoGate::from_config(&config, service.guard(), store);
//! let me = gate.authenticate(Some(&session.token))?;
//! # let _ = me;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod guard;
pub mod models;
pub mod password;
pub mod repositories;
pub mod service;
pub mod session;
pub mod store;
pub mod todos;
pub mod validation;

pub use config::{AuthConfig, ConfigError};
pub use error::{AuthError, AuthResult, FieldError, StoreError};
pub use guard::{Access, AuthorizationGuard};
pub use models::{Session, TodoId, User, UserId};
pub use password::{HasherConfig, PasswordHasher};
pub use service::{AuthService, ServiceOptions};
pub use session::{SessionIssuer, SharedClock};
pub use store::{CredentialStore, TodoOwnership};
pub use todos::{DenialPolicy, TodoGate};

/// Fixtures shared by unit and integration tests
#[cfg(any(test, feature = "test-support"))]
pub mod test_support {
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use mockable::MockClock;
    use secrecy::SecretString;
    use std::sync::{Arc, Mutex};

    use crate::password::{HasherConfig, PasswordHasher};
    use crate::session::SharedClock;

    /// Cheap parameters so the suite stays fast in debug builds.
    pub fn fast_hasher() -> PasswordHasher {
        PasswordHasher::new(HasherConfig {
            memory_kib: 256,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap()
    }

    pub fn secret() -> SecretString {
        SecretString::from("test-signing-secret-0123456789abcdef".to_string())
    }

    /// Fixed instant the fixtures start from
    pub fn epoch() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    /// Clock whose time only moves when told to.
    #[derive(Clone)]
    pub struct ManualClock {
        now: Arc<Mutex<DateTime<Utc>>>,
    }

    impl ManualClock {
        pub fn new(start: DateTime<Utc>) -> Self {
            Self {
                now: Arc::new(Mutex::new(start)),
            }
        }

        pub fn now(&self) -> DateTime<Utc> {
            *self.now.lock().unwrap()
        }

        /// A clock handle reading this manual time
        pub fn clock(&self) -> SharedClock {
            let now = Arc::clone(&self.now);
            let mut clock = MockClock::new();
            clock
                .expect_utc()
                .returning(move || *now.lock().unwrap());
            Arc::new(clock)
        }

        pub fn set(&self, at: DateTime<Utc>) {
            *self.now.lock().unwrap() = at;
        }

        pub fn advance(&self, by: Duration) {
            *self.now.lock().unwrap() += by;
        }
    }
}
