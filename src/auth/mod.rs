pub mod organization;
pub mod permissions;

use axum::http::{header::AUTHORIZATION, HeaderMap};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::{self, SecurityConfig};

pub use organization::{select_organization, selected_organization_id, OrganizationContext, SELECTED_ORGANIZATION_COOKIE};
pub use permissions::{require_permission, PermissionAction, PermissionEntity, Role};

pub const SESSION_COOKIE: &str = "__session";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("No session")]
    MissingSession,

    #[error("Invalid session token: {0}")]
    InvalidToken(String),

    #[error("Session secret not configured")]
    SecretNotConfigured,

    #[error("Session token generation failed: {0}")]
    TokenGeneration(String),

    #[error("{0}")]
    Forbidden(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, email: impl Into<String>, session_hours: u64) -> Self {
        let now = Utc::now();
        let hours = i64::try_from(session_hours).unwrap_or(i64::MAX / 3600);
        Self {
            sub: user_id,
            email: email.into(),
            exp: (now + Duration::hours(hours)).timestamp(),
            iat: now.timestamp(),
        }
    }
}

/// The signed-in user, as carried by the session token
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user_id: Uuid,
    pub email: String,
    pub expires_at: DateTime<Utc>,
}

impl From<Claims> for AuthSession {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
            expires_at: Utc.timestamp_opt(claims.exp, 0).single().unwrap_or_else(Utc::now),
        }
    }
}

pub fn generate_session_token(user_id: Uuid, email: &str) -> Result<String, AuthError> {
    generate_session_token_with(&config::config().security, user_id, email)
}

pub fn generate_session_token_with(
    security: &SecurityConfig,
    user_id: Uuid,
    email: &str,
) -> Result<String, AuthError> {
    if security.jwt_secret.is_empty() {
        return Err(AuthError::SecretNotConfigured);
    }
    let claims = Claims::new(user_id, email, security.session_hours);
    let encoding_key = EncodingKey::from_secret(security.jwt_secret.as_bytes());
    encode(&Header::default(), &claims, &encoding_key).map_err(|e| AuthError::TokenGeneration(e.to_string()))
}

pub fn validate_session_token(token: &str) -> Result<Claims, AuthError> {
    validate_session_token_with(&config::config().security, token)
}

pub fn validate_session_token_with(security: &SecurityConfig, token: &str) -> Result<Claims, AuthError> {
    if security.jwt_secret.is_empty() {
        return Err(AuthError::SecretNotConfigured);
    }
    let decoding_key = DecodingKey::from_secret(security.jwt_secret.as_bytes());
    decode::<Claims>(token, &decoding_key, &Validation::default())
        .map(|data| data.claims)
        .map_err(|e| AuthError::InvalidToken(e.to_string()))
}

/// Session token from the `__session` cookie, or a Bearer header for API clients
pub fn extract_session_token(headers: &HeaderMap, jar: &CookieJar) -> Result<String, AuthError> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        if !cookie.value().is_empty() {
            return Ok(cookie.value().to_string());
        }
    }

    let auth_str = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingSession)?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        Some(_) => Err(AuthError::InvalidToken("Empty bearer token".to_string())),
        None => Err(AuthError::InvalidToken(
            "Authorization header must use Bearer token format".to_string(),
        )),
    }
}

pub fn session_from_request(headers: &HeaderMap, jar: &CookieJar) -> Result<AuthSession, AuthError> {
    let token = extract_session_token(headers, jar)?;
    validate_session_token(&token).map(AuthSession::from)
}

/// Re-issue the session with a fresh expiry so active users stay signed in
pub fn commit_session(session: &AuthSession) -> Result<Cookie<'static>, AuthError> {
    commit_session_with(&config::config().security, session)
}

pub fn commit_session_with(security: &SecurityConfig, session: &AuthSession) -> Result<Cookie<'static>, AuthError> {
    let token = generate_session_token_with(security, session.user_id, &session.email)?;
    let hours = i64::try_from(security.session_hours).unwrap_or(i64::MAX / 3600);
    Ok(Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(security.secure_cookies)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::hours(hours))
        .build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn security(secret: &str) -> SecurityConfig {
        SecurityConfig {
            jwt_secret: secret.to_string(),
            session_hours: 1,
            secure_cookies: false,
            enable_cors: false,
            cors_origins: vec![],
        }
    }

    #[test]
    fn token_round_trip_keeps_identity() {
        let user_id = Uuid::new_v4();
        let token = generate_session_token_with(&security("s3cret"), user_id, "a@b.c").unwrap();
        let claims = validate_session_token_with(&security("s3cret"), &token).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.email, "a@b.c");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = generate_session_token_with(&security("one"), Uuid::new_v4(), "a@b.c").unwrap();
        assert!(matches!(
            validate_session_token_with(&security("two"), &token),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn empty_secret_is_a_configuration_error() {
        assert!(matches!(
            generate_session_token_with(&security(""), Uuid::new_v4(), "a@b.c"),
            Err(AuthError::SecretNotConfigured)
        ));
    }

    #[test]
    fn cookie_wins_over_bearer_header() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer header-token"));
        let jar = CookieJar::new().add(Cookie::new(SESSION_COOKIE, "cookie-token"));
        assert_eq!(extract_session_token(&headers, &jar).unwrap(), "cookie-token");
        assert_eq!(extract_session_token(&headers, &CookieJar::new()).unwrap(), "header-token");
    }

    #[test]
    fn missing_or_malformed_credentials() {
        assert!(matches!(
            extract_session_token(&HeaderMap::new(), &CookieJar::new()),
            Err(AuthError::MissingSession)
        ));
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(matches!(
            extract_session_token(&headers, &CookieJar::new()),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn committed_cookie_is_http_only_and_valid() {
        let session = AuthSession {
            user_id: Uuid::new_v4(),
            email: "a@b.c".into(),
            expires_at: Utc::now(),
        };
        let cookie = commit_session(&session).unwrap();
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.http_only(), Some(true));
        let claims = validate_session_token(cookie.value()).unwrap();
        assert_eq!(claims.sub, session.user_id);
    }

    #[test]
    fn session_cookie_is_secure_when_configured() {
        let session = AuthSession {
            user_id: Uuid::new_v4(),
            email: "a@b.c".into(),
            expires_at: Utc::now(),
        };
        let plain = commit_session_with(&security("s3cret"), &session).unwrap();
        assert_ne!(plain.secure(), Some(true));

        let secure = commit_session_with(
            &SecurityConfig {
                secure_cookies: true,
                ..security("s3cret")
            },
            &session,
        )
        .unwrap();
        assert_eq!(secure.secure(), Some(true));
        assert_eq!(secure.same_site(), Some(SameSite::Lax));
    }
}
