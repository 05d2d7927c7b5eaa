use super::reply::{MessageReply, Reply, ReplyKind};
use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rsvp_domain::config::{ApiConfig, JwtConfig};
use rsvp_domain::constants::SERVICE_KEY_HEADER;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::convert::Infallible;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::debug;

const BEARER: &str = "Bearer ";

#[rsvp_derive::rsvp_error]
pub enum IdentityError {
    #[error("Token error{}: {source}", format_context(.context))]
    Token { source: jsonwebtoken::errors::Error, context: Option<Cow<'static, str>> },

    #[error("Internal identity error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// Claims carried by caller tokens. `sub` is the account uid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerClaims {
    pub sub: String,
    pub iss: String,
    pub exp: u64,
}

/// The verified caller uid, or an empty string when the request carried no
/// valid bearer token.
///
/// Extraction never fails; operations decide what an anonymous caller may do.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Caller(pub String);

impl Caller {
    #[must_use]
    pub fn uid(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S> FromRequestParts<S> for Caller
where
    ApiConfig: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = ApiConfig::from_ref(state);
        let Some(token) = bearer_token(parts) else {
            return Ok(Self::default());
        };

        match verify_token(token, &config.security.identity.jwt) {
            Ok(claims) => Ok(Self(claims.sub)),
            Err(err) => {
                debug!(error = %err, "Rejected caller token");
                Ok(Self::default())
            },
        }
    }
}

/// Proof that the request carried the configured service key.
#[derive(Debug, Clone, Copy)]
pub struct ServiceKey;

impl<S> FromRequestParts<S> for ServiceKey
where
    ApiConfig: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Reply<MessageReply>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = ApiConfig::from_ref(state);
        let expected = config.security.service_key.as_bytes();
        let presented = parts.headers.get(SERVICE_KEY_HEADER).map(|v| v.as_bytes());

        match presented {
            Some(key) if !expected.is_empty() && keys_match(key, expected) => Ok(Self),
            _ => {
                debug!(path = %parts.uri.path(), "Missing or wrong service key");
                Err(Reply::new(ReplyKind::Unauthorized, MessageReply::new("Unauthorized")))
            },
        }
    }
}

/// Signs a caller token for `uid` valid for `ttl`.
///
/// Production tokens come from the identity provider; this is used by tests
/// and local tooling sharing the same secret.
///
/// # Errors
/// [`IdentityError::Token`] if signing fails, [`IdentityError::Internal`] if the
/// system clock is before the epoch.
pub fn issue_token(config: &JwtConfig, uid: &str, ttl: Duration) -> Result<String, IdentityError> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| IdentityError::Internal { message: e.to_string().into(), context: None })?;
    let claims = CallerClaims {
        sub: uid.to_owned(),
        iss: config.issuer.clone(),
        exp: (now + ttl).as_secs(),
    };

    encode(&Header::new(Algorithm::HS256), &claims, &EncodingKey::from_secret(config.secret.as_bytes()))
        .context("Signing caller token")
}

fn verify_token(token: &str, config: &JwtConfig) -> Result<CallerClaims, IdentityError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[config.issuer.as_str()]);
    validation.leeway = config.leeway_seconds;

    let data = decode::<CallerClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;
    Ok(data.claims)
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix(BEARER))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Length is not secret; the bytes are compared without early exit.
fn keys_match(presented: &[u8], expected: &[u8]) -> bool {
    presented.len() == expected.len()
        && presented.iter().zip(expected).fold(0u8, |acc, (a, b)| acc | (a ^ b)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jwt() -> JwtConfig {
        JwtConfig { secret: "test-secret".to_owned(), issuer: "rsvp".to_owned(), leeway_seconds: 0 }
    }

    #[test]
    fn issued_token_verifies() {
        let token = issue_token(&jwt(), "alice", Duration::from_secs(60)).unwrap();
        let claims = verify_token(&token, &jwt()).unwrap();
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.iss, "rsvp");
    }

    #[test]
    fn foreign_issuer_is_rejected() {
        let other = JwtConfig { issuer: "elsewhere".to_owned(), ..jwt() };
        let token = issue_token(&other, "alice", Duration::from_secs(60)).unwrap();
        assert!(matches!(verify_token(&token, &jwt()), Err(IdentityError::Token { .. })));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let other = JwtConfig { secret: "other".to_owned(), ..jwt() };
        let token = issue_token(&other, "alice", Duration::from_secs(60)).unwrap();
        assert!(verify_token(&token, &jwt()).is_err());
    }

    #[test]
    fn key_comparison() {
        assert!(keys_match(b"abc", b"abc"));
        assert!(!keys_match(b"abd", b"abc"));
        assert!(!keys_match(b"ab", b"abc"));
    }
}
