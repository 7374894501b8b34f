use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::economics::{RateTableError, RateTables};

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
    pub engine: EngineConfig,
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

        let rate_tables_path = env::var("SOLAR_RATE_TABLES")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            engine: EngineConfig {
                rate_tables_path,
                utility_rate: optional_positive("SOLAR_UTILITY_RATE")?,
                cost_per_watt: optional_positive("SOLAR_COST_PER_WATT")?,
            },
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

/// Where rate tables come from and which assumptions the deployment overrides.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub rate_tables_path: Option<PathBuf>,
    pub utility_rate: Option<f64>,
    pub cost_per_watt: Option<f64>,
}

impl EngineConfig {
    /// Build the process-wide rate tables once; overrides are validated with the rest.
    pub fn load_tables(&self) -> Result<RateTables, RateTableError> {
        let mut tables = match &self.rate_tables_path {
            Some(path) => RateTables::from_path(path)?,
            None => RateTables::standard(),
        };

        if let Some(rate) = self.utility_rate {
            tables.assumptions.default_utility_rate = rate;
        }
        if let Some(cost) = self.cost_per_watt {
            tables.assumptions.cost_per_watt = cost;
        }

        tables.validate()?;
        Ok(tables)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidAssumption { variable: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidAssumption { variable, value } => {
                write!(f, "{variable} must be a positive number, found '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidAssumption { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}

fn optional_positive(variable: &'static str) -> Result<Option<f64>, ConfigError> {
    let Ok(raw) = env::var(variable) else {
        return Ok(None);
    };
    if raw.trim().is_empty() {
        return Ok(None);
    }

    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => Ok(Some(value)),
        _ => Err(ConfigError::InvalidAssumption {
            variable,
            value: raw,
        }),
    }
}
