//! Environment-based server configuration.
//!
//! All knobs come from the environment (a `.env` file is loaded first):
//!
//! - `HOST` - bind address (default: `0.0.0.0`)
//! - `PORT` - bind port (default: `9090`)
//! - `QRIS_ENCODER_URL` - QR image encoder endpoint (required)
//! - `QRIS_ENCODER_TIMEOUT_MS` - encoder request timeout (default: `5000`)
//! - `QRIS_QR_WIDTH` - rendered image width in pixels (default: `300`)
//! - `QRIS_CORS_ALLOWED_ORIGINS` - comma-separated allowlist, or `*`

use std::net::IpAddr;
use std::time::Duration;

use url::Url;

/// A configuration variable that is missing or malformed.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("invalid {name}: {message}")]
    Invalid {
        name: &'static str,
        message: String,
    },
}

/// Resolved server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    host: IpAddr,
    port: u16,
    encoder_url: Url,
    encoder_timeout: Duration,
    qr_width: u32,
}

impl Config {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: parse("HOST", std::env::var("HOST").ok(), "0.0.0.0".parse().ok())?,
            port: parse("PORT", std::env::var("PORT").ok(), Some(9090))?,
            encoder_url: parse("QRIS_ENCODER_URL", std::env::var("QRIS_ENCODER_URL").ok(), None)?,
            encoder_timeout: Duration::from_millis(parse(
                "QRIS_ENCODER_TIMEOUT_MS",
                std::env::var("QRIS_ENCODER_TIMEOUT_MS").ok(),
                Some(5000),
            )?),
            qr_width: parse("QRIS_QR_WIDTH", std::env::var("QRIS_QR_WIDTH").ok(), Some(300))?,
        })
    }

    pub fn host(&self) -> IpAddr {
        self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn encoder_url(&self) -> &Url {
        &self.encoder_url
    }

    pub fn encoder_timeout(&self) -> Duration {
        self.encoder_timeout
    }

    pub fn qr_width(&self) -> u32 {
        self.qr_width
    }
}

/// Parses an optional raw value, falling back to `default`; a missing value
/// with no default is a [`ConfigError::Missing`].
fn parse<T: std::str::FromStr>(
    name: &'static str,
    raw: Option<String>,
    default: Option<T>,
) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match raw {
        Some(value) => value.parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            message: e.to_string(),
        }),
        None => default.ok_or(ConfigError::Missing(name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_uses_default_when_unset() {
        assert_eq!(parse::<u16>("PORT", None, Some(9090)).unwrap(), 9090);
    }

    #[test]
    fn test_parse_prefers_set_value() {
        assert_eq!(parse::<u16>("PORT", Some("8080".into()), Some(9090)).unwrap(), 8080);
    }

    #[test]
    fn test_parse_missing_required() {
        let err = parse::<Url>("QRIS_ENCODER_URL", None, None).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("QRIS_ENCODER_URL")));
    }

    #[test]
    fn test_parse_rejects_malformed_value() {
        let err = parse::<u16>("PORT", Some("not-a-port".into()), Some(9090)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "PORT", .. }));
    }
}
