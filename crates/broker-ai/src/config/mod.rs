use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use crate::workflows::mortgage::{Jurisdiction, ViabilityConfig};

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
    pub viability: ViabilityConfig,
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

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            viability: load_viability()?,
        })
    }
}

/// Rubric from `MORTGAGE_*` variables. A jurisdiction preset, when set, seeds
/// the taxes-and-fees rate; individual variables override it.
fn load_viability() -> Result<ViabilityConfig, ConfigError> {
    let mut config = match env::var("MORTGAGE_JURISDICTION") {
        Ok(raw) => raw
            .parse::<Jurisdiction>()
            .map_err(|_| ConfigError::InvalidJurisdiction(raw))?
            .viability_config(),
        Err(_) => ViabilityConfig::default(),
    };

    if let Some(rate) = env_number::<f64>("MORTGAGE_TAXES_AND_FEES_RATE")? {
        config.taxes_and_fees_rate = rate;
    }
    if let Some(age) = env_number::<u32>("MORTGAGE_YOUNG_AGE_THRESHOLD")? {
        config.young_age_threshold = age;
    }
    if let Some(ltv) = env_number::<f64>("MORTGAGE_LTV_THRESHOLD_YOUNG")? {
        config.ltv_threshold_young = ltv;
    }
    if let Some(ltv) = env_number::<f64>("MORTGAGE_LTV_THRESHOLD_OTHER")? {
        config.ltv_threshold_other = ltv;
    }
    if let Some(dti) = env_number::<f64>("MORTGAGE_MAX_VIABLE_DTI")? {
        config.max_viable_dti = dti;
    }
    if let Some(ltv) = env_number::<f64>("MORTGAGE_MAX_VIABLE_LTV")? {
        config.max_viable_ltv = ltv;
    }

    Ok(config)
}

fn env_number<T: FromStr + NonNegative>(key: &'static str) -> Result<Option<T>, ConfigError> {
    let Ok(raw) = env::var(key) else {
        return Ok(None);
    };
    match raw.trim().parse::<T>() {
        Ok(value) if value.is_non_negative() => Ok(Some(value)),
        _ => Err(ConfigError::InvalidNumber { key, value: raw }),
    }
}

trait NonNegative {
    fn is_non_negative(&self) -> bool;
}

impl NonNegative for f64 {
    fn is_non_negative(&self) -> bool {
        self.is_finite() && *self >= 0.0
    }
}

impl NonNegative for u32 {
    fn is_non_negative(&self) -> bool {
        true
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

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidJurisdiction(String),
    InvalidNumber { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidJurisdiction(value) => {
                write!(f, "MORTGAGE_JURISDICTION '{value}' is not a supported market")
            }
            ConfigError::InvalidNumber { key, value } => {
                write!(f, "{key} must be a non-negative number (found '{value}')")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidJurisdiction(_)
            | ConfigError::InvalidNumber { .. } => None,
        }
    }
}
