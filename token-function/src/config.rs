//! Function configuration.
//!
//! Loaded once at process start; the function never reads the environment
//! while serving requests.

use std::str::FromStr;

use auth::{JwtConfig, SigningSecret};
use error::ConfigError;

/// Environment variable holding the signing secret.
pub const SECRET_VAR: &str = "JWT_SECRET";
pub const NOT_BEFORE_VAR: &str = "TOKEN_NOT_BEFORE_SECS";
pub const EXPIRES_IN_VAR: &str = "TOKEN_EXPIRES_IN_SECS";
pub const DATA_ENCODING_VAR: &str = "TOKEN_DATA_ENCODING";

/// Upper bound for either window offset.
pub const MAX_WINDOW_SECS: i64 = 86_400;

/// How the issuance handler stores the request body in the `data` claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataEncoding {
    /// Store the parsed JSON value
    #[default]
    Parsed,
    /// Store the raw body text as a JSON string (legacy token format)
    RawString,
}

impl FromStr for DataEncoding {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "parsed" => Ok(Self::Parsed),
            "raw" => Ok(Self::RawString),
            other => Err(ConfigError::UnknownDataEncoding(other.to_string())),
        }
    }
}

/// Token function configuration
#[derive(Debug, Clone)]
pub struct FunctionConfig {
    /// Signing secret and validity window
    pub jwt: JwtConfig,

    /// Storage format of the `data` claim
    pub data_encoding: DataEncoding,

    /// Function version
    pub version: String,
}

impl FunctionConfig {
    /// Create a configuration with default window and encoding.
    pub fn new(secret: SigningSecret) -> Self {
        Self {
            jwt: JwtConfig::new(secret),
            data_encoding: DataEncoding::default(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup(SECRET_VAR)
            .filter(|value| !value.is_empty())
            .map(SigningSecret::new)
            .ok_or(ConfigError::MissingSecret(SECRET_VAR))?;

        let mut config = Self::new(secret);

        if let Some(value) = lookup(NOT_BEFORE_VAR) {
            match value.parse() {
                Ok(n) => config.jwt.not_before_secs = n,
                Err(_) => tracing::warn!("Ignoring invalid {}: {:?}", NOT_BEFORE_VAR, value),
            }
        }

        if let Some(value) = lookup(EXPIRES_IN_VAR) {
            match value.parse() {
                Ok(n) => config.jwt.expires_in_secs = n,
                Err(_) => tracing::warn!("Ignoring invalid {}: {:?}", EXPIRES_IN_VAR, value),
            }
        }

        if let Some(value) = lookup(DATA_ENCODING_VAR) {
            config.data_encoding = value.parse()?;
        }

        config.validate()
    }

    /// Set the validity window.
    pub fn with_window(mut self, not_before_secs: i64, expires_in_secs: i64) -> Self {
        self.jwt = self.jwt.with_window(not_before_secs, expires_in_secs);
        self
    }

    /// Set the data claim encoding.
    pub fn with_data_encoding(mut self, encoding: DataEncoding) -> Self {
        self.data_encoding = encoding;
        self
    }

    /// Reject windows in which no token could ever be valid, and offsets
    /// outside `0..=MAX_WINDOW_SECS`.
    pub fn validate(self) -> Result<Self, ConfigError> {
        let window = 0..=MAX_WINDOW_SECS;
        if !window.contains(&self.jwt.not_before_secs) || !window.contains(&self.jwt.expires_in_secs) {
            return Err(ConfigError::WindowOutOfRange {
                not_before_secs: self.jwt.not_before_secs,
                expires_in_secs: self.jwt.expires_in_secs,
                max_secs: MAX_WINDOW_SECS,
            });
        }

        if self.jwt.not_before_secs >= self.jwt.expires_in_secs {
            return Err(ConfigError::EmptyValidityWindow {
                not_before_secs: self.jwt.not_before_secs,
                expires_in_secs: self.jwt.expires_in_secs,
            });
        }
        Ok(self)
    }
}
