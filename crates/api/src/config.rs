use std::str::FromStr;

use yanote_core::slug::DEFAULT_WARNING_SUFFIX;

use crate::auth::session::SessionConfig;

/// Default minimum password length for new accounts.
const DEFAULT_MIN_PASSWORD_LENGTH: usize = 8;

/// A configuration value that could not be used.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set in the environment")]
    Missing(&'static str),

    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// Server configuration loaded from environment variables.
///
/// Everything except the session secret has a default suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// PostgreSQL URL. `None` runs against the in-memory store.
    pub database_url: Option<String>,
    /// Pool size when `database_url` is set (default: `10`).
    pub database_max_connections: u32,
    /// Minimum password length enforced at signup (default: `8`).
    pub min_password_length: usize,
    /// Appended to a taken slug in the duplicate-slug form error.
    pub slug_warning_suffix: String,
    /// Session cookie and token settings.
    pub session: SessionConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                 |
    /// |----------------------------|-------------------------|
    /// | `HOST`                     | `0.0.0.0`               |
    /// | `PORT`                     | `8000`                  |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                    |
    /// | `DATABASE_URL`             | unset (in-memory store) |
    /// | `DATABASE_MAX_CONNECTIONS` | `10`                    |
    /// | `MIN_PASSWORD_LENGTH`      | `8`                     |
    /// | `SLUG_WARNING_SUFFIX`      | Russian warning text    |
    ///
    /// Session variables are documented on [`SessionConfig::from_env`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = parse_env("PORT", 8000)?;
        let request_timeout_secs = parse_env("REQUEST_TIMEOUT_SECS", 30)?;

        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());
        let database_max_connections = parse_env("DATABASE_MAX_CONNECTIONS", 10)?;

        let min_password_length = parse_env("MIN_PASSWORD_LENGTH", DEFAULT_MIN_PASSWORD_LENGTH)?;
        let slug_warning_suffix = std::env::var("SLUG_WARNING_SUFFIX")
            .unwrap_or_else(|_| DEFAULT_WARNING_SUFFIX.to_string());

        let session = SessionConfig::from_env()?;

        Ok(Self {
            host,
            port,
            request_timeout_secs,
            database_url,
            database_max_connections,
            min_password_length,
            slug_warning_suffix,
            session,
        })
    }

    /// Local-development defaults around the given session config.
    pub fn with_session(session: SessionConfig) -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            request_timeout_secs: 30,
            database_url: None,
            database_max_connections: 10,
            min_password_length: DEFAULT_MIN_PASSWORD_LENGTH,
            slug_warning_suffix: DEFAULT_WARNING_SUFFIX.to_string(),
            session,
        }
    }
}

/// Parse `name` from the environment, falling back to `default` when unset.
pub(crate) fn parse_env<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}
