//! Stateless session tokens
//!
//! A session token is an HS256 JWT carrying the user id, issuance time and
//! expiry. It is signed with a server-held secret, so any alteration is
//! detected on validation. No server-side session table exists; a token
//! stays valid until it expires or the secret is rotated.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tracing::debug;

use crate::error::{AuthError, AuthResult};
use crate::models::{Claims, Session, UserId};

/// Shortest signing secret accepted, in bytes
pub const MIN_SECRET_LEN: usize = 32;

/// Longest session lifetime accepted (one year)
pub const MAX_SESSION_TTL: std::time::Duration = std::time::Duration::from_secs(365 * 86_400);

/// Time source shared by everything that reads the clock
pub type SharedClock = Arc<dyn Clock + Send + Sync>;

/// Issues and validates session tokens
#[derive(Clone)]
pub struct SessionIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
    clock: SharedClock,
}

impl SessionIssuer {
    /// Initialize a new issuer
    ///
    /// # Arguments
    /// * `secret` - HMAC signing secret, at least [`MIN_SECRET_LEN`] bytes
    /// * `ttl` - lifetime of every issued token
    /// * `clock` - time source for issuance and expiry checks
    pub fn new(
        secret: &SecretString,
        ttl: std::time::Duration,
        clock: SharedClock,
    ) -> AuthResult<Self> {
        let secret = secret.expose_secret().as_bytes();
        if secret.len() < MIN_SECRET_LEN {
            return Err(AuthError::Internal(format!(
                "Session secret must be at least {} bytes",
                MIN_SECRET_LEN
            )));
        }

        if ttl > MAX_SESSION_TTL {
            return Err(AuthError::Internal(format!(
                "Session ttl must be at most {} seconds",
                MAX_SESSION_TTL.as_secs()
            )));
        }

        let ttl = Duration::from_std(ttl)
            .map_err(|e| AuthError::Internal(format!("Invalid session ttl: {}", e)))?;
        if ttl <= Duration::zero() {
            return Err(AuthError::Internal(
                "Session ttl must be positive".to_string(),
            ));
        }

        // Expiry is checked against the injected clock in `validate`.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl,
            clock,
        })
    }

    /// Issue a token bound to `user_id`
    pub fn issue(&self, user_id: UserId) -> AuthResult<Session> {
        let now = self.clock.utc();
        let issued_at = whole_seconds(now)?;
        let expires_at = issued_at
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AuthError::Internal("Session expiry out of range".to_string()))?;

        let claims = Claims {
            sub: user_id.to_string(),
            iat: unix_seconds(issued_at)?,
            exp: unix_seconds(expires_at)?,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("Failed to sign session token: {}", e)))?;

        Ok(Session {
            token,
            user_id,
            issued_at,
            expires_at,
        })
    }

    /// Validate a token and return the user it is bound to.
    ///
    /// The signature is checked before the expiry, so a tampered token is
    /// always [`AuthError::InvalidToken`] even when it is also stale.
    pub fn validate(&self, token: &str) -> AuthResult<UserId> {
        if token.trim().is_empty() {
            return Err(AuthError::InvalidToken);
        }

        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                debug!("Rejected session token: {}", e);
                AuthError::InvalidToken
            })?
            .claims;

        let user_id = claims
            .sub
            .parse::<i64>()
            .map(UserId)
            .map_err(|_| AuthError::InvalidToken)?;

        let now = unix_seconds(self.clock.utc())?;
        if now > claims.exp {
            debug!("Session token for user {} expired", user_id);
            return Err(AuthError::ExpiredToken);
        }

        Ok(user_id)
    }

    /// Lifetime of issued tokens
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

fn whole_seconds(at: DateTime<Utc>) -> AuthResult<DateTime<Utc>> {
    DateTime::from_timestamp(at.timestamp(), 0)
        .ok_or_else(|| AuthError::Internal("Clock out of range".to_string()))
}

fn unix_seconds(at: DateTime<Utc>) -> AuthResult<u64> {
    u64::try_from(at.timestamp())
        .map_err(|_| AuthError::Internal("Clock before unix epoch".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ManualClock, secret};
    use chrono::TimeZone;

    const DAY: std::time::Duration = std::time::Duration::from_secs(86_400);

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn issuer(clock: &ManualClock) -> SessionIssuer {
        SessionIssuer::new(&secret(), DAY, clock.clock()).unwrap()
    }

    #[test]
    fn issued_token_validates_to_its_user() {
        let clock = ManualClock::new(start());
        let issuer = issuer(&clock);

        let session = issuer.issue(UserId(42)).unwrap();
        assert_eq!(session.issued_at, start());
        assert_eq!(session.expires_at, start() + Duration::hours(24));
        assert_eq!(issuer.validate(&session.token).unwrap(), UserId(42));
    }

    #[test]
    fn token_is_valid_up_to_and_including_expiry() {
        let clock = ManualClock::new(start());
        let issuer = issuer(&clock);
        let session = issuer.issue(UserId(1)).unwrap();

        clock.set(session.expires_at);
        assert_eq!(issuer.validate(&session.token), Ok(UserId(1)));

        clock.advance(Duration::seconds(1));
        assert_eq!(issuer.validate(&session.token), Err(AuthError::ExpiredToken));
    }

    #[test]
    fn expired_token_stays_expired() {
        let clock = ManualClock::new(start());
        let issuer = issuer(&clock);
        let session = issuer.issue(UserId(1)).unwrap();

        clock.advance(Duration::days(2));
        assert_eq!(issuer.validate(&session.token), Err(AuthError::ExpiredToken));
        assert_eq!(issuer.validate(&session.token), Err(AuthError::ExpiredToken));
    }

    #[test]
    fn any_single_character_change_invalidates_the_token() {
        let clock = ManualClock::new(start());
        let issuer = issuer(&clock);
        let token = issuer.issue(UserId(7)).unwrap().token;

        for (index, original) in token.char_indices() {
            if original == '.' {
                continue;
            }
            let replacement = if original == 'A' { 'B' } else { 'A' };
            let mut tampered = token.clone();
            tampered.replace_range(index..index + 1, &replacement.to_string());

            assert_eq!(
                issuer.validate(&tampered),
                Err(AuthError::InvalidToken),
                "tampering at byte {index} went undetected"
            );
        }
    }

    #[test]
    fn tampered_expired_token_reports_invalid_not_expired() {
        let clock = ManualClock::new(start());
        let issuer = issuer(&clock);
        let token = issuer.issue(UserId(7)).unwrap().token;
        let (head, last) = token.split_at(token.len() - 1);
        let tampered = format!("{}{}", head, if last == "A" { "B" } else { "A" });

        clock.advance(Duration::days(3));
        assert_eq!(issuer.validate(&tampered), Err(AuthError::InvalidToken));
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() {
        let clock = ManualClock::new(start());
        let other = SessionIssuer::new(
            &SecretString::from("another-secret-that-is-long-enough!!".to_string()),
            DAY,
            clock.clock(),
        )
        .unwrap();

        let token = other.issue(UserId(7)).unwrap().token;
        assert_eq!(issuer(&clock).validate(&token), Err(AuthError::InvalidToken));
    }

    #[test]
    fn malformed_and_absent_tokens_are_invalid() {
        let clock = ManualClock::new(start());
        let issuer = issuer(&clock);

        for token in ["", "   ", "not-a-token", "a.b.c"] {
            assert_eq!(issuer.validate(token), Err(AuthError::InvalidToken));
        }
    }

    #[test]
    fn short_secret_is_refused() {
        let clock = ManualClock::new(start());
        let result = SessionIssuer::new(
            &SecretString::from("short".to_string()),
            DAY,
            clock.clock(),
        );
        assert!(matches!(result, Err(AuthError::Internal(_))));
    }

    #[test]
    fn oversized_ttl_is_refused() {
        let clock = ManualClock::new(start());
        let result = SessionIssuer::new(
            &secret(),
            std::time::Duration::from_secs(10_000_000_000_000),
            clock.clock(),
        );
        assert!(matches!(result, Err(AuthError::Internal(_))));

        assert!(SessionIssuer::new(&secret(), MAX_SESSION_TTL, clock.clock()).is_ok());
    }

    #[test]
    fn expiry_past_the_calendar_limit_is_an_error() {
        let clock = ManualClock::new(DateTime::<Utc>::MAX_UTC - Duration::hours(1));
        let issuer = issuer(&clock);

        assert!(matches!(
            issuer.issue(UserId(1)),
            Err(AuthError::Internal(_))
        ));
    }
}
