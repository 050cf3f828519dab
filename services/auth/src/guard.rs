//! Request-level authentication and ownership decisions

use tracing::debug;

use crate::error::{AuthError, AuthResult};
use crate::models::UserId;
use crate::session::SessionIssuer;

/// Outcome of an ownership check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    Deny,
}

impl Access {
    pub fn is_allowed(self) -> bool {
        self == Access::Allow
    }
}

/// Resolves session tokens to users and decides resource ownership.
///
/// The guard holds no state of its own beyond the issuer; every decision is
/// made from the presented token and the owner passed in.
#[derive(Clone)]
pub struct AuthorizationGuard {
    issuer: SessionIssuer,
}

impl AuthorizationGuard {
    pub fn new(issuer: SessionIssuer) -> Self {
        Self { issuer }
    }

    /// Resolve the presented token to a user.
    ///
    /// Every validation failure, including a missing token, collapses to
    /// [`AuthError::Unauthenticated`].
    pub fn authenticate(&self, token: Option<&str>) -> AuthResult<UserId> {
        let token = token.ok_or_else(|| {
            debug!("No session token presented");
            AuthError::Unauthenticated
        })?;

        self.issuer.validate(token).map_err(|e| {
            debug!("Session token rejected: {}", e);
            AuthError::Unauthenticated
        })
    }

    /// Allow only when the authenticated user is the resource owner
    pub fn authorize_ownership(&self, user_id: UserId, owner_id: UserId) -> Access {
        if user_id == owner_id {
            Access::Allow
        } else {
            debug!("User {} denied access to resource of user {}", user_id, owner_id);
            Access::Deny
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ManualClock, epoch, secret};
    use chrono::Duration;

    fn guard(clock: &ManualClock) -> (AuthorizationGuard, SessionIssuer) {
        let issuer = SessionIssuer::new(
            &secret(),
            std::time::Duration::from_secs(3_600),
            clock.clock(),
        )
        .unwrap();
        (AuthorizationGuard::new(issuer.clone()), issuer)
    }

    fn clock() -> ManualClock {
        ManualClock::new(epoch())
    }

    #[test]
    fn valid_token_resolves_to_user() {
        let clock = clock();
        let (guard, issuer) = guard(&clock);
        let session = issuer.issue(UserId(5)).unwrap();

        assert_eq!(guard.authenticate(Some(&session.token)), Ok(UserId(5)));
    }

    #[test]
    fn every_token_failure_is_unauthenticated() {
        let clock = clock();
        let (guard, issuer) = guard(&clock);
        let session = issuer.issue(UserId(5)).unwrap();

        assert_eq!(guard.authenticate(None), Err(AuthError::Unauthenticated));
        assert_eq!(guard.authenticate(Some("")), Err(AuthError::Unauthenticated));
        assert_eq!(
            guard.authenticate(Some("garbage")),
            Err(AuthError::Unauthenticated)
        );

        clock.advance(Duration::hours(2));
        assert_eq!(
            guard.authenticate(Some(&session.token)),
            Err(AuthError::Unauthenticated)
        );
    }

    #[test]
    fn ownership_requires_identical_ids() {
        let clock = clock();
        let (guard, _) = guard(&clock);

        assert_eq!(guard.authorize_ownership(UserId(1), UserId(1)), Access::Allow);
        assert_eq!(guard.authorize_ownership(UserId(1), UserId(2)), Access::Deny);
        assert!(!guard.authorize_ownership(UserId(2), UserId(1)).is_allowed());
    }
}
