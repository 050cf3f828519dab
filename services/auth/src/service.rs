//! Sign-up and sign-in
//!
//! [`AuthService`] is the single entry point for identity operations. It
//! validates input, consults the credential store, hashes and verifies
//! passwords and issues sessions. It keeps no user or session state between
//! calls.

use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::AuthConfig;
use crate::error::{AuthError, AuthResult};
use crate::guard::AuthorizationGuard;
use crate::models::{NewUser, Session, User};
use crate::password::PasswordHasher;
use crate::session::{SessionIssuer, SharedClock};
use crate::store::{CredentialStore, with_deadline};
use crate::validation::{normalize_email, validate_sign_up};

/// Tunables for [`AuthService`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceOptions {
    /// Minimum password length in characters
    pub password_min_length: usize,
    /// Deadline applied to each storage call
    pub storage_timeout: Duration,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            password_min_length: 1,
            storage_timeout: Duration::from_secs(5),
        }
    }
}

/// Identity operations over an injected credential store
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    hasher: PasswordHasher,
    issuer: SessionIssuer,
    options: ServiceOptions,
    /// Verified against when the email is unknown, so both sign-in failure
    /// paths cost one hash verification.
    decoy_hash: String,
}

impl AuthService {
    /// Initialize a new authentication service
    pub fn new(
        store: Arc<dyn CredentialStore>,
        hasher: PasswordHasher,
        issuer: SessionIssuer,
        options: ServiceOptions,
    ) -> AuthResult<Self> {
        let decoy_hash = hasher.hash("decoy-password-never-assigned")?;

        Ok(Self {
            store,
            hasher,
            issuer,
            options,
            decoy_hash,
        })
    }

    /// Wire a service from configuration
    pub fn from_config(
        config: &AuthConfig,
        store: Arc<dyn CredentialStore>,
        clock: SharedClock,
    ) -> AuthResult<Self> {
        let hasher = PasswordHasher::new(config.hasher)?;
        let issuer = SessionIssuer::new(&config.session_secret, config.session_ttl, clock)?;

        Self::new(
            store,
            hasher,
            issuer,
            ServiceOptions {
                password_min_length: config.password_min_length,
                storage_timeout: config.storage_timeout,
            },
        )
    }

    /// Register a new user.
    ///
    /// Fails with [`AuthError::Validation`] naming every bad field, or
    /// [`AuthError::Conflict`] when the email is taken. No session is issued.
    pub async fn sign_up(&self, name: &str, email: &str, password: &str) -> AuthResult<User> {
        let name = name.trim();
        let email = normalize_email(email);
        info!("Sign-up attempt for {}", email);

        validate_sign_up(name, &email, password, self.options.password_min_length).map_err(
            |fields| {
                info!("Sign-up for {} rejected: {} invalid field(s)", email, fields.len());
                AuthError::Validation(fields)
            },
        )?;

        let existing = with_deadline(
            self.options.storage_timeout,
            "find_user_by_email",
            self.store.find_user_by_email(&email),
        )
        .await?;
        if existing.is_some() {
            warn!("Sign-up for {} rejected: email already registered", email);
            return Err(AuthError::Conflict);
        }

        let new_user = NewUser {
            name: name.to_string(),
            email,
            password_hash: self.hasher.hash(password)?,
        };

        // The store's uniqueness rule settles races the lookup above missed.
        let id = with_deadline(
            self.options.storage_timeout,
            "insert_user",
            self.store.insert_user(&new_user),
        )
        .await
        .inspect_err(|e| {
            if *e == AuthError::Conflict {
                warn!("Sign-up for {} lost a race on the email", new_user.email);
            }
        })?;

        info!("Created user {} for {}", id, new_user.email);
        Ok(new_user.into_user(id))
    }

    /// Verify credentials and issue a session.
    ///
    /// An unknown email and a wrong password both fail with the same
    /// [`AuthError::NotFound`], so the response does not reveal whether an
    /// account exists.
    pub async fn sign_in(&self, email: &str, password: &str) -> AuthResult<(User, Session)> {
        let email = normalize_email(email);

        let record = with_deadline(
            self.options.storage_timeout,
            "find_user_by_email",
            self.store.find_user_by_email(&email),
        )
        .await?;

        let Some(record) = record else {
            let _ = self.hasher.verify(password, &self.decoy_hash);
            info!("Sign-in failed for {}", email);
            return Err(AuthError::NotFound("user"));
        };

        match self.hasher.verify(password, &record.password_hash) {
            Ok(true) => {}
            Ok(false) => {
                info!("Sign-in failed for {}", email);
                return Err(AuthError::NotFound("user"));
            }
            Err(e) => {
                warn!("Stored hash for user {} is unusable: {}", record.id, e);
                return Err(AuthError::NotFound("user"));
            }
        }

        let session = self.issuer.issue(record.id)?;
        info!("User {} signed in", record.id);

        Ok((record.to_user(), session))
    }

    /// A guard sharing this service's session issuer
    pub fn guard(&self) -> AuthorizationGuard {
        AuthorizationGuard::new(self.issuer.clone())
    }

    pub fn issuer(&self) -> &SessionIssuer {
        &self.issuer
    }
}
