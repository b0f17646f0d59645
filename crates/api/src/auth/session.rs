//! Session tokens carried by the login cookie.
//!
//! The cookie holds an HS256-signed JWT whose `jti` names a row in
//! `user_sessions`. Only the SHA-256 hash of the `jti` is persisted, so a
//! database leak does not expose usable cookies, and revoking the row logs
//! the browser out even while the token itself is still unexpired.

use axum::http::header::COOKIE;
use axum::http::HeaderMap;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;
use yanote_core::types::DbId;

use crate::config::{parse_env, ConfigError};

/// Default session lifetime: two weeks.
const DEFAULT_TTL_HOURS: i64 = 336;
/// Default cookie name.
pub const DEFAULT_COOKIE_NAME: &str = "sessionid";

/// Claims embedded in every session token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the user's internal database id.
    pub sub: DbId,
    pub username: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Session identifier (UUID v4); its hash keys the session row.
    pub jti: String,
}

/// Session token and cookie settings.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    pub ttl_hours: i64,
    pub cookie_name: String,
    /// Add the `Secure` attribute (HTTPS deployments).
    pub cookie_secure: bool,
}

impl SessionConfig {
    /// Defaults around the given secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ttl_hours: DEFAULT_TTL_HOURS,
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            cookie_secure: false,
        }
    }

    /// Load session configuration from environment variables.
    ///
    /// | Env Var                 | Required | Default     |
    /// |-------------------------|----------|-------------|
    /// | `SESSION_SECRET`        | **yes**  | --          |
    /// | `SESSION_TTL_HOURS`     | no       | `336`       |
    /// | `SESSION_COOKIE_NAME`   | no       | `sessionid` |
    /// | `SESSION_COOKIE_SECURE` | no       | `false`     |
    pub fn from_env() -> Result<Self, ConfigError> {
        let secret = std::env::var("SESSION_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("SESSION_SECRET"))?;

        let ttl_hours: i64 = parse_env("SESSION_TTL_HOURS", DEFAULT_TTL_HOURS)?;
        if ttl_hours <= 0 {
            return Err(ConfigError::Invalid {
                name: "SESSION_TTL_HOURS",
                value: ttl_hours.to_string(),
            });
        }

        let cookie_name = std::env::var("SESSION_COOKIE_NAME")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_COOKIE_NAME.to_string());
        let cookie_secure = parse_env("SESSION_COOKIE_SECURE", false)?;

        Ok(Self {
            secret,
            ttl_hours,
            cookie_name,
            cookie_secure,
        })
    }

    pub fn max_age_secs(&self) -> i64 {
        self.ttl_hours * 3600
    }
}

/// A freshly issued session, ready to be persisted and sent to the browser.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    /// Signed token for the cookie value.
    pub token: String,
    /// Hash of the `jti`, stored in `user_sessions.token_hash`.
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
}

/// Issue a session token for the given user.
pub fn issue_session(
    user_id: DbId,
    username: &str,
    config: &SessionConfig,
) -> Result<IssuedSession, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(config.ttl_hours);
    let jti = Uuid::new_v4().to_string();

    let claims = Claims {
        sub: user_id,
        username: username.to_string(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
        jti,
    };

    let token = encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )?;

    Ok(IssuedSession {
        token,
        token_hash: hash_session_id(&claims.jti),
        expires_at,
    })
}

/// Validate and decode a session token (signature and `exp`).
pub fn validate_token(
    token: &str,
    config: &SessionConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}

/// SHA-256 hex digest of a session identifier.
pub fn hash_session_id(jti: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(jti.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// `Set-Cookie` value that stores `token` in the browser.
pub fn session_cookie(token: &str, config: &SessionConfig) -> String {
    cookie_header(&config.cookie_name, token, config.max_age_secs(), config)
}

/// `Set-Cookie` value that removes the session cookie.
pub fn clear_session_cookie(config: &SessionConfig) -> String {
    cookie_header(&config.cookie_name, "", 0, config)
}

fn cookie_header(name: &str, value: &str, max_age: i64, config: &SessionConfig) -> String {
    let mut cookie = format!("{name}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}");
    if config.cookie_secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Value of the cookie called `name`, if the request sent one.
pub fn read_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn test_config() -> SessionConfig {
        SessionConfig::new("test-secret-that-is-long-enough-for-hmac")
    }

    #[test]
    fn test_issue_and_validate() {
        let config = test_config();
        let issued = issue_session(42, "Автор", &config).unwrap();

        let claims = validate_token(&issued.token, &config).unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.username, "Автор");
        assert!(claims.exp > claims.iat);
        assert_eq!(hash_session_id(&claims.jti), issued.token_hash);
        assert_eq!(issued.expires_at.timestamp(), claims.exp);
    }

    #[test]
    fn test_expired_token_fails() {
        let config = test_config();
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: 1,
            username: "user".to_string(),
            exp: now - 300,
            iat: now - 600,
            jti: Uuid::new_v4().to_string(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();

        assert!(validate_token(&token, &config).is_err());
    }

    #[test]
    fn test_different_secrets_fail() {
        let issued = issue_session(1, "user", &SessionConfig::new("secret-alpha")).unwrap();
        assert!(validate_token(&issued.token, &SessionConfig::new("secret-bravo")).is_err());
    }

    #[test]
    fn test_hash_is_sha256_hex() {
        let hash = hash_session_id("abc");
        assert_eq!(hash.len(), 64);
        assert_eq!(hash, hash_session_id("abc"));
    }

    #[test]
    fn test_cookie_attributes() {
        let mut config = test_config();
        let cookie = session_cookie("tok", &config);
        assert_eq!(
            cookie,
            "sessionid=tok; Path=/; HttpOnly; SameSite=Lax; Max-Age=1209600"
        );

        config.cookie_secure = true;
        let cleared = clear_session_cookie(&config);
        assert!(cleared.starts_with("sessionid=; "));
        assert!(cleared.contains("Max-Age=0"));
        assert!(cleared.ends_with("; Secure"));
    }

    #[test]
    fn test_read_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; sessionid=abc.def; other=1"),
        );
        assert_eq!(read_cookie(&headers, "sessionid"), Some("abc.def"));
        assert_eq!(read_cookie(&headers, "missing"), None);

        headers.insert(COOKIE, HeaderValue::from_static("sessionid="));
        assert_eq!(read_cookie(&headers, "sessionid"), None);
    }
}
