//! Process configuration, read once at startup.
//!
//! Every value is looked up through an injectable function so tests can build
//! a config without touching the process environment.

use std::net::{AddrParseError, SocketAddr};

use thiserror::Error;

use remitdesk_auth::{SecretError, SigningSecret};
use remitdesk_observability::{LogFormat, LogSettings};

pub const SECRET_VAR: &str = "REMITDESK_JWT_SECRET";
pub const BIND_ADDR_VAR: &str = "REMITDESK_BIND_ADDR";
pub const SECURE_COOKIES_VAR: &str = "REMITDESK_SECURE_COOKIES";
pub const LOG_FORMAT_VAR: &str = "REMITDESK_LOG_FORMAT";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} is not set; a signing secret is required")]
    MissingSecret { var: &'static str },

    #[error("{var} is unusable: {source}")]
    InvalidSecret {
        var: &'static str,
        #[source]
        source: SecretError,
    },

    #[error("{var}='{value}' is not a socket address: {source}")]
    InvalidBindAddr {
        var: &'static str,
        value: String,
        #[source]
        source: AddrParseError,
    },

    #[error("{var}='{value}' is not a boolean (expected true or false)")]
    InvalidBool { var: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub signing_secret: SigningSecret,
    pub secure_cookies: bool,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw_secret = lookup(SECRET_VAR).ok_or(ConfigError::MissingSecret { var: SECRET_VAR })?;
        let signing_secret = SigningSecret::new(raw_secret)
            .map_err(|source| ConfigError::InvalidSecret { var: SECRET_VAR, source })?;

        let bind_value = lookup(BIND_ADDR_VAR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_value
            .trim()
            .parse()
            .map_err(|source| ConfigError::InvalidBindAddr {
                var: BIND_ADDR_VAR,
                value: bind_value.clone(),
                source,
            })?;

        let secure_cookies = match lookup(SECURE_COOKIES_VAR) {
            None => false,
            Some(v) => parse_bool(&v).ok_or(ConfigError::InvalidBool {
                var: SECURE_COOKIES_VAR,
                value: v,
            })?,
        };

        Ok(Self {
            bind_addr,
            signing_secret,
            secure_cookies,
        })
    }
}

/// Logging settings. Read separately so logging is up before the rest of the
/// config is validated (and its errors can be logged).
pub fn log_settings(lookup: impl Fn(&str) -> Option<String>) -> LogSettings {
    LogSettings {
        format: lookup(LOG_FORMAT_VAR)
            .map(|v| LogFormat::parse(&v))
            .unwrap_or_default(),
        ..LogSettings::default()
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
