use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub marketplace: MarketplaceConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let marketplace = MarketplaceConfig::from_env()?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            marketplace,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Listing rules applied when sellers publish builds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketplaceConfig {
    pub min_price_cents: u32,
    pub max_price_cents: u32,
    pub require_moderation: bool,
}

impl Default for MarketplaceConfig {
    fn default() -> Self {
        Self {
            min_price_cents: 99,
            max_price_cents: 50_000,
            require_moderation: true,
        }
    }
}

impl MarketplaceConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let min_price_cents = parse_price("MARKET_MIN_PRICE_CENTS", defaults.min_price_cents)?;
        let max_price_cents = parse_price("MARKET_MAX_PRICE_CENTS", defaults.max_price_cents)?;
        if min_price_cents > max_price_cents {
            return Err(ConfigError::InvertedPriceRange {
                min: min_price_cents,
                max: max_price_cents,
            });
        }

        let require_moderation = match env::var("MARKET_REQUIRE_MODERATION") {
            Ok(raw) => parse_flag(&raw).ok_or(ConfigError::InvalidFlag {
                key: "MARKET_REQUIRE_MODERATION",
                value: raw,
            })?,
            Err(_) => defaults.require_moderation,
        };

        Ok(Self {
            min_price_cents,
            max_price_cents,
            require_moderation,
        })
    }
}

fn parse_price(key: &'static str, default: u32) -> Result<u32, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<u32>()
            .map_err(|_| ConfigError::InvalidPrice { key, value: raw }),
        Err(_) => Ok(default),
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidPrice { key: &'static str, value: String },
    InvertedPriceRange { min: u32, max: u32 },
    InvalidFlag { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { source } => {
                write!(f, "APP_HOST must be a valid IP address: {source}")
            }
            ConfigError::InvalidPrice { key, value } => {
                write!(f, "{key} must be a whole number of cents (found '{value}')")
            }
            ConfigError::InvertedPriceRange { min, max } => write!(
                f,
                "MARKET_MIN_PRICE_CENTS ({min}) exceeds MARKET_MAX_PRICE_CENTS ({max})"
            ),
            ConfigError::InvalidFlag { key, value } => {
                write!(f, "{key} must be true/false (found '{value}')")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}
