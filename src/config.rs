use std::env;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::path::PathBuf;

use tracing::{info, warn};

use crate::engine::{ConfigError, EngineConfig};

/// Complete application configuration, loaded from environment variables or default values.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub store: StoreConfig,
    pub engine: EngineOverrides,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Creates a configuration from the currently available environment variables.
    pub fn from_env() -> Self {
        Self {
            api: ApiConfig::from_env(),
            store: StoreConfig::from_env(),
            engine: EngineOverrides::from_env(),
            logging: LoggingConfig::from_env(),
        }
    }
}

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    bind_ip: IpAddr,
    display_host: String,
    port: u16,
}

impl ApiConfig {
    const DEFAULT_HOST: &'static str = "0.0.0.0";
    const DEFAULT_PORT: u16 = 8080;

    fn from_env() -> Self {
        let host_value =
            env_string("BOX_ADVISOR_API_HOST").unwrap_or_else(|| Self::DEFAULT_HOST.to_string());
        let (bind_ip, effective_host) = match host_value.parse::<IpAddr>() {
            Ok(ip) => (ip, host_value),
            Err(err) => {
                warn!(
                    value = %host_value,
                    error = %err,
                    "could not parse BOX_ADVISOR_API_HOST, using {}",
                    Self::DEFAULT_HOST
                );
                (
                    IpAddr::V4(Ipv4Addr::UNSPECIFIED),
                    Self::DEFAULT_HOST.to_string(),
                )
            }
        };

        let port = match env_string("BOX_ADVISOR_API_PORT") {
            Some(raw) => match raw.parse::<u16>() {
                Ok(value) if value != 0 => value,
                Ok(_) => {
                    warn!(
                        "BOX_ADVISOR_API_PORT must not be 0, using {}",
                        Self::DEFAULT_PORT
                    );
                    Self::DEFAULT_PORT
                }
                Err(err) => {
                    warn!(
                        value = %raw,
                        error = %err,
                        "could not parse BOX_ADVISOR_API_PORT, using {}",
                        Self::DEFAULT_PORT
                    );
                    Self::DEFAULT_PORT
                }
            },
            None => Self::DEFAULT_PORT,
        };

        Self {
            bind_ip,
            display_host: effective_host,
            port,
        }
    }

    /// Socket address to bind the server to.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_ip, self.port)
    }

    /// Visible hostname for logging and hints.
    pub fn display_host(&self) -> &str {
        &self.display_host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Indicates whether binding to all interfaces.
    pub fn binds_to_all_interfaces(&self) -> bool {
        match self.bind_ip {
            IpAddr::V4(addr) => addr == Ipv4Addr::UNSPECIFIED,
            IpAddr::V6(addr) => addr == Ipv6Addr::UNSPECIFIED,
        }
    }

    pub fn uses_default_host(&self) -> bool {
        self.display_host == Self::DEFAULT_HOST
    }
}

/// Locations of the store inventory and the packing guidelines.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    store_file: PathBuf,
    guidelines_file: PathBuf,
}

impl StoreConfig {
    const DEFAULT_STORE_FILE: &'static str = "stores/store.yml";
    const DEFAULT_GUIDELINES_FILE: &'static str = "stores/packing_guidelines.yml";

    fn from_env() -> Self {
        Self {
            store_file: env_string("BOX_ADVISOR_STORE_FILE")
                .unwrap_or_else(|| Self::DEFAULT_STORE_FILE.to_string())
                .into(),
            guidelines_file: env_string("BOX_ADVISOR_GUIDELINES_FILE")
                .unwrap_or_else(|| Self::DEFAULT_GUIDELINES_FILE.to_string())
                .into(),
        }
    }

    pub fn store_file(&self) -> &PathBuf {
        &self.store_file
    }

    pub fn guidelines_file(&self) -> &PathBuf {
        &self.guidelines_file
    }
}

/// Engine settings that override the guidelines file.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EngineOverrides {
    pub max_recommendations: Option<usize>,
    pub extreme_cut_threshold: Option<f64>,
    pub telescoping_overlap: Option<f64>,
}

impl EngineOverrides {
    const MAX_RECOMMENDATIONS_VAR: &'static str = "BOX_ADVISOR_MAX_RECOMMENDATIONS";
    const EXTREME_CUT_VAR: &'static str = "BOX_ADVISOR_EXTREME_CUT_THRESHOLD";
    const OVERLAP_VAR: &'static str = "BOX_ADVISOR_TELESCOPING_OVERLAP";

    fn from_env() -> Self {
        let max_recommendations = env_string(Self::MAX_RECOMMENDATIONS_VAR).and_then(|raw| {
            match raw.parse::<usize>() {
                Ok(value) if value > 0 => Some(value),
                Ok(_) => {
                    warn!("{} must be at least 1, ignoring", Self::MAX_RECOMMENDATIONS_VAR);
                    None
                }
                Err(err) => {
                    warn!(
                        value = %raw,
                        error = %err,
                        "could not parse {}, ignoring",
                        Self::MAX_RECOMMENDATIONS_VAR
                    );
                    None
                }
            }
        });

        let extreme_cut_threshold = load_f64_with_warning(
            Self::EXTREME_CUT_VAR,
            |value| value > 0.0 && value <= 1.0,
            "must be in (0, 1]",
            "Adjusted extreme cut threshold changes which manual cuts are offered",
        );

        let telescoping_overlap = load_f64_with_warning(
            Self::OVERLAP_VAR,
            |value| value >= 0.0,
            "must not be negative",
            "Adjusted telescoping overlap changes box counts for long items",
        );

        Self {
            max_recommendations,
            extreme_cut_threshold,
            telescoping_overlap,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Applies the overrides and revalidates the configuration.
    pub fn apply(&self, config: EngineConfig) -> Result<EngineConfig, ConfigError> {
        let mut builder = config.into_builder();
        if let Some(max) = self.max_recommendations {
            builder = builder.max_recommendations(max);
        }
        if let Some(threshold) = self.extreme_cut_threshold {
            builder = builder.extreme_cut_threshold(threshold);
        }
        if let Some(overlap) = self.telescoping_overlap {
            builder = builder.telescoping_overlap(overlap);
        }
        builder.build()
    }
}

/// Output format of the log subscriber.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
    Json,
}

/// Logging setup read by the binary before anything else runs.
#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub filter: String,
    pub format: LogFormat,
}

impl LoggingConfig {
    const DEFAULT_FILTER: &'static str = "info";

    pub fn from_env() -> Self {
        let format = match env_string("BOX_ADVISOR_LOG_FORMAT") {
            Some(raw) => parse_log_format(&raw).unwrap_or_else(|| {
                // the subscriber is not installed yet
                eprintln!(
                    "BOX_ADVISOR_LOG_FORMAT ('{}') is not one of compact, pretty, json; using compact",
                    raw
                );
                LogFormat::Compact
            }),
            None => LogFormat::Compact,
        };
        Self {
            filter: env_string("BOX_ADVISOR_LOG")
                .unwrap_or_else(|| Self::DEFAULT_FILTER.to_string()),
            format,
        }
    }
}

fn parse_log_format(raw: &str) -> Option<LogFormat> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "compact" | "text" => Some(LogFormat::Compact),
        "pretty" => Some(LogFormat::Pretty),
        "json" => Some(LogFormat::Json),
        _ => None,
    }
}

fn env_string(name: &str) -> Option<String> {
    match env::var(name) {
        Ok(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_owned())
            }
        }
        Err(env::VarError::NotPresent) => None,
        Err(err) => {
            warn!(var = name, error = %err, "environment access failed, using default value");
            None
        }
    }
}

fn load_f64_with_warning(
    var_name: &str,
    validator: impl Fn(f64) -> bool,
    invalid_hint: &str,
    notice: &str,
) -> Option<f64> {
    let raw = env_string(var_name)?;
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && validator(value) => {
            info!(var = var_name, value, "{}", notice);
            Some(value)
        }
        Ok(_) => {
            warn!(var = var_name, value = %raw, "{}, ignoring", invalid_hint);
            None
        }
        Err(err) => {
            warn!(var = var_name, value = %raw, error = %err, "could not parse as number, ignoring");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{StrategyPreferences, Weights};

    fn base() -> EngineConfig {
        EngineConfig::builder(Weights::new(0.45, 0.25, 0.30), StrategyPreferences::reference())
            .build()
            .unwrap()
    }

    #[test]
    fn test_parse_log_format_values() {
        assert_eq!(parse_log_format("json"), Some(LogFormat::Json));
        assert_eq!(parse_log_format(" Pretty "), Some(LogFormat::Pretty));
        assert_eq!(parse_log_format("COMPACT"), Some(LogFormat::Compact));
        assert_eq!(parse_log_format("text"), Some(LogFormat::Compact));
    }

    #[test]
    fn test_parse_log_format_invalid_values() {
        assert_eq!(parse_log_format("xml"), None);
        assert_eq!(parse_log_format(""), None);
        assert_eq!(parse_log_format("  "), None);
    }

    #[test]
    fn empty_overrides_keep_config() {
        let overrides = EngineOverrides::default();
        assert!(overrides.is_empty());
        assert_eq!(overrides.apply(base()).unwrap(), base());
    }

    #[test]
    fn overrides_replace_values() {
        let overrides = EngineOverrides {
            max_recommendations: Some(3),
            extreme_cut_threshold: None,
            telescoping_overlap: Some(0.0),
        };
        let config = overrides.apply(base()).unwrap();
        assert_eq!(config.max_recommendations, 3);
        assert_eq!(config.telescoping_overlap, 0.0);
        assert_eq!(
            config.extreme_cut_threshold,
            EngineConfig::DEFAULT_EXTREME_CUT_THRESHOLD
        );
    }

    #[test]
    fn invalid_override_is_rejected() {
        let overrides = EngineOverrides {
            extreme_cut_threshold: Some(1.5),
            ..Default::default()
        };
        assert!(matches!(
            overrides.apply(base()),
            Err(ConfigError::InvalidExtremeCutThreshold(_))
        ));
    }
}
