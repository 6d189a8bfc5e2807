use std::env;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_TOKEN_TTL_SECS: u64 = 24 * 60 * 60;
pub const MAX_TOKEN_TTL_SECS: u64 = 365 * DEFAULT_TOKEN_TTL_SECS;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Signing material handed to the auth service and the token middleware.
#[derive(Debug, Clone)]
pub struct TokenSettings {
    pub secret: String,
    pub ttl_secs: u64,
}

impl TokenSettings {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ttl_secs: DEFAULT_TOKEN_TTL_SECS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub token: TokenSettings,
    pub seed_properties: Vec<String>,
    pub cors_allowed_origin: Option<String>,
}

impl AppConfig {
    /// Reads `.env` if present, then the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup("JWT_SECRET")
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let seed_properties = lookup("SEED_PROPERTIES")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        let ttl_secs = parse_or(&lookup, "TOKEN_TTL_SECS", DEFAULT_TOKEN_TTL_SECS)?;
        if ttl_secs == 0 || ttl_secs > MAX_TOKEN_TTL_SECS {
            return Err(ConfigError::Invalid {
                key: "TOKEN_TTL_SECS",
                value: ttl_secs.to_string(),
            });
        }

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_or(&lookup, "PORT", 8080)?,
            token: TokenSettings {
                secret,
                ttl_secs,
            },
            seed_properties,
            cors_allowed_origin: lookup("CORS_ALLOWED_ORIGIN").filter(|s| !s.is_empty()),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}
