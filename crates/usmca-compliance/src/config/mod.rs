use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::workflows::qualification::{BusinessType, ThresholdSchedule};

const DEFAULT_THRESHOLD: f64 = 62.5;
const DEFAULT_SUM_TOLERANCE: f64 = 0.5;
const DEFAULT_FRESHNESS_DAYS: i64 = 90;
const DEFAULT_VOLATILE_FRESHNESS_DAYS: i64 = 7;
const DEFAULT_TRADE_VOLUME: f64 = 500_000.0;

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
    pub qualification: QualificationConfig,
    pub tariff_cache: TariffCacheConfig,
    pub savings: SavingsConfig,
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

        let default_threshold = read_f64("USMCA_DEFAULT_THRESHOLD", DEFAULT_THRESHOLD)?;
        if !(default_threshold > 0.0 && default_threshold <= 100.0) {
            return Err(ConfigError::OutOfRange {
                key: "USMCA_DEFAULT_THRESHOLD",
                value: default_threshold.to_string(),
            });
        }

        let mut thresholds = ThresholdSchedule::standard(default_threshold);
        if let Ok(raw) = env::var("USMCA_THRESHOLD_OVERRIDES") {
            for (business_type, percent) in parse_threshold_overrides(&raw)? {
                thresholds.set(business_type, percent);
            }
        }

        let sum_tolerance = read_f64("USMCA_SUM_TOLERANCE", DEFAULT_SUM_TOLERANCE)?;
        if sum_tolerance < 0.0 {
            return Err(ConfigError::OutOfRange {
                key: "USMCA_SUM_TOLERANCE",
                value: sum_tolerance.to_string(),
            });
        }

        let freshness_window_days = read_days("TARIFF_FRESHNESS_DAYS", DEFAULT_FRESHNESS_DAYS)?;
        let volatile_window_days = read_days(
            "TARIFF_VOLATILE_FRESHNESS_DAYS",
            DEFAULT_VOLATILE_FRESHNESS_DAYS,
        )?;

        let default_trade_volume = read_f64("DEFAULT_TRADE_VOLUME", DEFAULT_TRADE_VOLUME)?;
        if default_trade_volume < 0.0 {
            return Err(ConfigError::OutOfRange {
                key: "DEFAULT_TRADE_VOLUME",
                value: default_trade_volume.to_string(),
            });
        }

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                ansi: environment == AppEnvironment::Development,
            },
            qualification: QualificationConfig {
                thresholds,
                sum_tolerance,
            },
            tariff_cache: TariffCacheConfig {
                freshness_window_days,
                volatile_window_days,
            },
            savings: SavingsConfig {
                default_trade_volume,
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
    /// Colorized output; only for interactive development sessions.
    pub ansi: bool,
}

/// Threshold schedule and input tolerance for the RVC evaluator.
#[derive(Debug, Clone)]
pub struct QualificationConfig {
    pub thresholds: ThresholdSchedule,
    pub sum_tolerance: f64,
}

impl Default for QualificationConfig {
    fn default() -> Self {
        Self {
            thresholds: ThresholdSchedule::standard(DEFAULT_THRESHOLD),
            sum_tolerance: DEFAULT_SUM_TOLERANCE,
        }
    }
}

/// Freshness windows applied by the tariff cache gate and health report.
#[derive(Debug, Clone, Copy)]
pub struct TariffCacheConfig {
    pub freshness_window_days: i64,
    pub volatile_window_days: i64,
}

impl Default for TariffCacheConfig {
    fn default() -> Self {
        Self {
            freshness_window_days: DEFAULT_FRESHNESS_DAYS,
            volatile_window_days: DEFAULT_VOLATILE_FRESHNESS_DAYS,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SavingsConfig {
    pub default_trade_volume: f64,
}

impl Default for SavingsConfig {
    fn default() -> Self {
        Self {
            default_trade_volume: DEFAULT_TRADE_VOLUME,
        }
    }
}

fn read_f64(key: &'static str, default: f64) -> Result<f64, ConfigError> {
    match env::var(key) {
        Ok(raw) => {
            let value = raw
                .trim()
                .parse::<f64>()
                .map_err(|_| ConfigError::InvalidNumber {
                    key,
                    value: raw.clone(),
                })?;
            if value.is_finite() {
                Ok(value)
            } else {
                Err(ConfigError::InvalidNumber { key, value: raw })
            }
        }
        Err(_) => Ok(default),
    }
}

fn read_days(key: &'static str, default: i64) -> Result<i64, ConfigError> {
    match env::var(key) {
        Ok(raw) => {
            let days = raw
                .trim()
                .parse::<i64>()
                .map_err(|_| ConfigError::InvalidNumber {
                    key,
                    value: raw.clone(),
                })?;
            if days <= 0 {
                return Err(ConfigError::OutOfRange { key, value: raw });
            }
            Ok(days)
        }
        Err(_) => Ok(default),
    }
}

/// Parse `automotive=75,textiles=62.5` into typed threshold overrides.
pub fn parse_threshold_overrides(raw: &str) -> Result<Vec<(BusinessType, f64)>, ConfigError> {
    let mut overrides = Vec::new();

    for entry in raw.split(',').map(str::trim).filter(|entry| !entry.is_empty()) {
        let (name, percent) = entry
            .split_once('=')
            .ok_or_else(|| ConfigError::MalformedOverride {
                entry: entry.to_string(),
            })?;

        let business_type =
            BusinessType::resolve(name).ok_or_else(|| ConfigError::UnknownBusinessType {
                value: name.trim().to_string(),
            })?;

        let percent = percent
            .trim()
            .parse::<f64>()
            .map_err(|_| ConfigError::MalformedOverride {
                entry: entry.to_string(),
            })?;
        if !(percent > 0.0 && percent <= 100.0) {
            return Err(ConfigError::OutOfRange {
                key: "USMCA_THRESHOLD_OVERRIDES",
                value: entry.to_string(),
            });
        }

        overrides.push((business_type, percent));
    }

    Ok(overrides)
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { key: &'static str, value: String },
    OutOfRange { key: &'static str, value: String },
    UnknownBusinessType { value: String },
    MalformedOverride { entry: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { key, value } => {
                write!(f, "{key} must be a finite number (found '{value}')")
            }
            ConfigError::OutOfRange { key, value } => {
                write!(f, "{key} is outside its allowed range (found '{value}')")
            }
            ConfigError::UnknownBusinessType { value } => {
                write!(f, "USMCA_THRESHOLD_OVERRIDES names unknown business type '{value}'")
            }
            ConfigError::MalformedOverride { entry } => write!(
                f,
                "USMCA_THRESHOLD_OVERRIDES entry '{entry}' must look like business_type=percent"
            ),
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "USMCA_DEFAULT_THRESHOLD",
            "USMCA_THRESHOLD_OVERRIDES",
            "USMCA_SUM_TOLERANCE",
            "TARIFF_FRESHNESS_DAYS",
            "TARIFF_VOLATILE_FRESHNESS_DAYS",
            "DEFAULT_TRADE_VOLUME",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.qualification.thresholds.default_threshold(), 62.5);
        assert_eq!(config.qualification.sum_tolerance, 0.5);
        assert_eq!(config.tariff_cache.freshness_window_days, 90);
        assert_eq!(config.tariff_cache.volatile_window_days, 7);
        assert_eq!(config.savings.default_trade_volume, 500_000.0);
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn threshold_overrides_replace_schedule_entries() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("USMCA_THRESHOLD_OVERRIDES", "automotive=70, apparel = 55");
        let config = AppConfig::load().expect("config loads");
        let schedule = &config.qualification.thresholds;
        assert_eq!(schedule.threshold_for(BusinessType::Automotive), 70.0);
        assert_eq!(schedule.threshold_for(BusinessType::Textiles), 55.0);
        assert_eq!(schedule.threshold_for(BusinessType::Electronics), 65.0);
        reset_env();
    }

    #[test]
    fn rejects_unknown_business_type_in_overrides() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("USMCA_THRESHOLD_OVERRIDES", "spaceships=90");
        match AppConfig::load() {
            Err(ConfigError::UnknownBusinessType { value }) => assert_eq!(value, "spaceships"),
            other => panic!("expected unknown business type, got {other:?}"),
        }
        reset_env();
    }

    #[test]
    fn rejects_default_threshold_outside_percentage_range() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("USMCA_DEFAULT_THRESHOLD", "0");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::OutOfRange {
                key: "USMCA_DEFAULT_THRESHOLD",
                ..
            })
        ));

        env::set_var("USMCA_DEFAULT_THRESHOLD", "sixty");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidNumber { .. })
        ));
        reset_env();
    }

    #[test]
    fn malformed_override_entries_are_reported() {
        assert!(matches!(
            parse_threshold_overrides("automotive"),
            Err(ConfigError::MalformedOverride { .. })
        ));
        assert!(matches!(
            parse_threshold_overrides("automotive=120"),
            Err(ConfigError::OutOfRange { .. })
        ));
        assert!(parse_threshold_overrides("").expect("empty is fine").is_empty());
    }
}
