use crate::model::{Id, user::UserMarker};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter};
use thiserror::Error;
use time::{Duration, OffsetDateTime};

/// Fixed validity window of a session token, measured from issuance.
pub const TOKEN_TTL: Duration = Duration::hours(1);

#[derive(Debug, Error)]
pub enum AuthTokenError {
    #[error("The token has expired")]
    Expired,
    #[error("The token could not be verified: {0}")]
    Invalid(jsonwebtoken::errors::Error),
    #[error("The token could not be signed: {0}")]
    Sign(jsonwebtoken::errors::Error),
}

/// Signed session token payload. Self-contained: validity is determined
/// entirely by the signature and the expiry claim, nothing is persisted.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Id<UserMarker>,
    pub iat: i64,
    pub exp: i64,
}

/// HS256 signing and verification keys derived from the process-wide
/// secret. Constructed once at startup and shared read-only.
#[derive(Clone)]
pub struct AuthKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl AuthKeys {
    #[must_use]
    pub fn from_secret(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // A token is good up to exactly issued-at + TOKEN_TTL, not longer.
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    pub fn issue_at(
        &self,
        user_id: Id<UserMarker>,
        issued_at: OffsetDateTime,
    ) -> Result<String, AuthTokenError> {
        let claims = Claims {
            sub: user_id,
            iat: issued_at.unix_timestamp(),
            exp: (issued_at + TOKEN_TTL).unix_timestamp(),
        };

        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding)
            .map_err(AuthTokenError::Sign)
    }

    pub fn issue(&self, user_id: Id<UserMarker>) -> Result<String, AuthTokenError> {
        self.issue_at(user_id, OffsetDateTime::now_utc())
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthTokenError> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| match err.kind() {
                ErrorKind::ExpiredSignature => AuthTokenError::Expired,
                _ => AuthTokenError::Invalid(err),
            })
    }
}

impl Debug for AuthKeys {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthKeys")
            .field("encoding", &"[redacted]")
            .field("decoding", &"[redacted]")
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::{AuthKeys, AuthTokenError, TOKEN_TTL};
    use crate::model::Id;
    use time::{Duration, OffsetDateTime};

    #[test]
    fn issued_token_round_trips() {
        let keys = AuthKeys::from_secret(b"test-secret");
        let user_id = Id::new(17);

        let token = keys.issue(user_id).unwrap();
        let claims = keys.verify(&token).unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL.whole_seconds());
    }

    #[test]
    fn expired_token_is_rejected() {
        let keys = AuthKeys::from_secret(b"test-secret");
        let issued_at = OffsetDateTime::now_utc() - Duration::hours(2);

        let token = keys.issue_at(Id::new(17), issued_at).unwrap();

        assert!(matches!(
            keys.verify(&token),
            Err(AuthTokenError::Expired)
        ));
    }

    #[test]
    fn token_within_validity_window_is_accepted() {
        let keys = AuthKeys::from_secret(b"test-secret");
        let issued_at = OffsetDateTime::now_utc() - TOKEN_TTL + Duration::minutes(5);

        let token = keys.issue_at(Id::new(17), issued_at).unwrap();

        assert!(keys.verify(&token).is_ok());
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let keys = AuthKeys::from_secret(b"test-secret");
        let other_keys = AuthKeys::from_secret(b"other-secret");

        let token = other_keys.issue(Id::new(17)).unwrap();

        assert!(matches!(
            keys.verify(&token),
            Err(AuthTokenError::Invalid(_))
        ));
    }

    #[test]
    fn garbage_token_is_rejected() {
        let keys = AuthKeys::from_secret(b"test-secret");

        assert!(matches!(
            keys.verify("not-a-token"),
            Err(AuthTokenError::Invalid(_))
        ));
    }
}
