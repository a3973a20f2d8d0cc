/*
 * Responsibility
 * - load settings from environment variables (.env supported)
 * - validate them once at startup (missing/invalid -> startup fails)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        match std::env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Key material used to verify access tokens.
///
/// The variant also pins the accepted JWT algorithm (EdDSA or HS256).
#[derive(Clone)]
pub enum AccessTokenKey {
    Ed25519PublicPem(String),
    Hs256Secret(String),
}

impl fmt::Debug for AccessTokenKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        match self {
            Self::Ed25519PublicPem(_) => f.write_str("Ed25519PublicPem(..)"),
            Self::Hs256Secret(_) => f.write_str("Hs256Secret(..)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub access_token_key: AccessTokenKey,
    pub auth_issuer: Option<String>,
    pub auth_audience: Option<String>,
    pub access_token_leeway_seconds: u64,

    // None => in-process revocation store (development only)
    pub valkey_url: Option<String>,
    pub revocation_key_prefix: String,

    pub database_url: String,

    pub collaborator_timeout: Duration,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_env();

        let access_token_key = access_token_key_from_env()?;

        let auth_issuer = non_empty_var("AUTH_ISSUER");
        let auth_audience = non_empty_var("AUTH_AUDIENCE");

        let access_token_leeway_seconds = std::env::var("ACCESS_TOKEN_LEEWAY_SECONDS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(60);

        let valkey_url = non_empty_var("VALKEY_URL");
        if valkey_url.is_none() && app_env.is_production() {
            return Err(ConfigError::Missing("VALKEY_URL"));
        }

        let revocation_key_prefix =
            non_empty_var("REVOCATION_KEY_PREFIX").unwrap_or_else(|| "auth:revoked".to_string());

        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        let collaborator_timeout = match std::env::var("AUTH_COLLABORATOR_TIMEOUT_MS") {
            Ok(v) => v
                .parse::<u64>()
                .ok()
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis)
                .ok_or(ConfigError::Invalid("AUTH_COLLABORATOR_TIMEOUT_MS"))?,
            Err(_) => Duration::from_millis(2000),
        };

        let request_timeout = std::env::var("REQUEST_TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(30));

        Ok(Self {
            addr,
            app_env,
            access_token_key,
            auth_issuer,
            auth_audience,
            access_token_leeway_seconds,
            valkey_url,
            revocation_key_prefix,
            database_url,
            collaborator_timeout,
            request_timeout,
        })
    }
}

fn access_token_key_from_env() -> Result<AccessTokenKey, ConfigError> {
    if let Some(pem) = non_empty_var("ACCESS_JWT_PUBLIC_KEY_PEM") {
        return Ok(AccessTokenKey::Ed25519PublicPem(pem.replace("\\n", "\n")));
    }

    non_empty_var("ACCESS_JWT_SECRET")
        .map(AccessTokenKey::Hs256Secret)
        .ok_or(ConfigError::Missing(
            "ACCESS_JWT_PUBLIC_KEY_PEM or ACCESS_JWT_SECRET",
        ))
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
