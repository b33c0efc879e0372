use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

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
    pub waitlist: WaitlistConfig,
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
            waitlist: WaitlistConfig::from_env()?,
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

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

pub const DEFAULT_NOTIFY_RECIPIENT: &str = "your-email@example.com";
pub const DEFAULT_WEBHOOK_TIMEOUT_SECS: u64 = 10;

/// Waitlist registrar wiring: optional webhooks and where the position counter lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitlistConfig {
    /// Generic collector (spreadsheet-style) webhook. `None` disables delivery.
    pub collector_url: Option<String>,
    /// Email relay webhook. `None` disables delivery.
    pub email_relay_url: Option<String>,
    pub notify_recipient: String,
    /// File backing the counter store. `None` keeps the counter in memory.
    pub counter_path: Option<PathBuf>,
    pub webhook_timeout: Duration,
}

impl Default for WaitlistConfig {
    fn default() -> Self {
        Self {
            collector_url: None,
            email_relay_url: None,
            notify_recipient: DEFAULT_NOTIFY_RECIPIENT.to_string(),
            counter_path: None,
            webhook_timeout: Duration::from_secs(DEFAULT_WEBHOOK_TIMEOUT_SECS),
        }
    }
}

impl WaitlistConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let timeout_secs = match non_empty_var("AFTERLY_WEBHOOK_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::InvalidWebhookTimeout)?,
            None => DEFAULT_WEBHOOK_TIMEOUT_SECS,
        };

        Ok(Self {
            collector_url: non_empty_var("AFTERLY_SHEETS_URL"),
            email_relay_url: non_empty_var("AFTERLY_EMAIL_SERVICE_URL"),
            notify_recipient: non_empty_var("AFTERLY_NOTIFY_EMAIL")
                .unwrap_or_else(|| DEFAULT_NOTIFY_RECIPIENT.to_string()),
            counter_path: non_empty_var("AFTERLY_COUNTER_PATH").map(PathBuf::from),
            webhook_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidWebhookTimeout,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidWebhookTimeout => {
                write!(f, "AFTERLY_WEBHOOK_TIMEOUT_SECS must be a positive integer")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidWebhookTimeout => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
