//! Bearer token issuance and validation.
//!
//! Tokens are stateless HS256 JWTs carrying the account email as the
//! subject claim and an absolute expiry. There is no server-side
//! revocation: a token stays valid until its expiry passes.

use crate::error::{AuthError, Error};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

/// Signed token payload.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// Subject: the account email. Optional on decode so a verified
    /// token without a subject can be rejected explicitly.
    #[serde(skip_serializing_if = "Option::is_none")]
    sub: Option<String>,
    /// Absolute expiry (unix seconds).
    exp: i64,
    /// Issue time (unix seconds).
    iat: i64,
}

/// Issues and validates signed bearer tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    /// Create a token service from a signing secret and default lifetime.
    pub fn new(secret: &str, ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is exact: a token is invalid the moment `exp` passes.
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    /// Issue a token for `subject` with the configured lifetime.
    pub fn issue(&self, subject: &str) -> Result<String, Error> {
        self.issue_with_ttl(subject, self.ttl)
    }

    /// Issue a token for `subject` expiring `ttl` from now.
    pub fn issue_with_ttl(&self, subject: &str, ttl: Duration) -> Result<String, Error> {
        let now = OffsetDateTime::now_utc();
        let claims = Claims {
            sub: Some(subject.to_string()),
            exp: (now + ttl).unix_timestamp(),
            iat: now.unix_timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| Error::TokenEncoding(e.to_string()))
    }

    /// Validate a token and return its subject.
    ///
    /// Signature and expiry are checked by the same decode call, so a
    /// parse failure, a bad signature, and an expired token all come
    /// back as [`AuthError::TokenMalformed`]. A token that verifies but
    /// has no subject fails with [`AuthError::TokenMissingSubject`].
    pub fn validate(&self, token: &str) -> Result<String, AuthError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|_| AuthError::TokenMalformed)?;
        match data.claims.sub {
            Some(sub) if !sub.is_empty() => Ok(sub),
            _ => Err(AuthError::TokenMissingSubject),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit-test-secret";

    fn service() -> TokenService {
        TokenService::new(SECRET, Duration::minutes(30))
    }

    #[test]
    fn issue_then_validate_returns_subject() {
        let tokens = service();
        let token = tokens.issue("alice@example.com").unwrap();
        assert_eq!(tokens.validate(&token).unwrap(), "alice@example.com");
    }

    #[test]
    fn garbage_token_is_malformed() {
        let tokens = service();
        assert_eq!(
            tokens.validate("not-a-token"),
            Err(AuthError::TokenMalformed)
        );
        assert_eq!(tokens.validate(""), Err(AuthError::TokenMalformed));
    }

    #[test]
    fn wrong_secret_fails_verification() {
        let issuer = TokenService::new("other-secret", Duration::minutes(30));
        let token = issuer.issue("alice@example.com").unwrap();
        assert_eq!(service().validate(&token), Err(AuthError::TokenMalformed));
    }

    #[test]
    fn expired_token_is_malformed() {
        let tokens = service();
        let token = tokens
            .issue_with_ttl("alice@example.com", Duration::minutes(-1))
            .unwrap();
        assert_eq!(tokens.validate(&token), Err(AuthError::TokenMalformed));
    }

    #[test]
    fn token_without_subject_is_rejected() {
        let claims = Claims {
            sub: None,
            exp: (OffsetDateTime::now_utc() + Duration::minutes(5)).unix_timestamp(),
            iat: OffsetDateTime::now_utc().unix_timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        assert_eq!(
            service().validate(&token),
            Err(AuthError::TokenMissingSubject)
        );
    }

    #[test]
    fn empty_subject_is_rejected() {
        let claims = Claims {
            sub: Some(String::new()),
            exp: (OffsetDateTime::now_utc() + Duration::minutes(5)).unix_timestamp(),
            iat: OffsetDateTime::now_utc().unix_timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        assert_eq!(
            service().validate(&token),
            Err(AuthError::TokenMissingSubject)
        );
    }
}
