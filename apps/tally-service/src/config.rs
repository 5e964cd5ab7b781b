//! Tally service configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Prefix prepended to every metric name.
pub const ENV_METRICS_NAMESPACE: &str = "TALLY_METRICS_NAMESPACE";
/// Comma-separated latency histogram buckets, in seconds.
pub const ENV_HISTOGRAM_BUCKETS: &str = "TALLY_HISTOGRAM_BUCKETS";
/// tracing filter directive.
pub const ENV_LOG_FILTER: &str = "TALLY_LOG_FILTER";
/// `pretty` or `compact`.
pub const ENV_LOG_FORMAT: &str = "TALLY_LOG_FORMAT";

/// Tally service configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Metric naming and buckets
    pub metrics: MetricsConfig,

    /// Log output
    pub log: LogConfig,
}

/// Metrics configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Optional namespace, e.g. `tally` gives `tally_todos_total`
    pub namespace: Option<String>,

    /// Request duration buckets in seconds (default: Prometheus defaults)
    pub buckets: Vec<f64>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        MetricsConfig {
            namespace: None,
            buckets: prometheus::DEFAULT_BUCKETS.to_vec(),
        }
    }
}

/// Log configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// `EnvFilter` directive (default: info)
    pub filter: String,

    /// Output format
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            filter: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Multi-line, human friendly.
    #[default]
    Pretty,
    /// One line per event.
    Compact,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            _ => Err(ConfigError::InvalidValue(ENV_LOG_FORMAT.to_string())),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ServiceConfig::default();

        let namespace = lookup(ENV_METRICS_NAMESPACE).filter(|ns| !ns.is_empty());
        if let Some(ref ns) = namespace {
            if !is_valid_metric_name(ns) {
                return Err(ConfigError::InvalidValue(ENV_METRICS_NAMESPACE.to_string()));
            }
        }

        let buckets = match lookup(ENV_HISTOGRAM_BUCKETS) {
            Some(raw) => parse_buckets(&raw)?,
            None => defaults.metrics.buckets,
        };

        let filter = lookup(ENV_LOG_FILTER).unwrap_or(defaults.log.filter);

        let format = match lookup(ENV_LOG_FORMAT) {
            Some(raw) => raw.parse()?,
            None => defaults.log.format,
        };

        Ok(ServiceConfig {
            metrics: MetricsConfig { namespace, buckets },
            log: LogConfig { filter, format },
        })
    }
}

/// Parses `"0.01, 0.1, 1"` into strictly increasing, finite buckets.
fn parse_buckets(raw: &str) -> Result<Vec<f64>, ConfigError> {
    let buckets = raw
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<f64>()
                .map_err(|_| ConfigError::InvalidValue(ENV_HISTOGRAM_BUCKETS.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if buckets.is_empty() {
        return Err(ConfigError::InvalidBuckets("no buckets given".to_string()));
    }

    if buckets.iter().any(|b| !b.is_finite()) {
        return Err(ConfigError::InvalidBuckets("buckets must be finite".to_string()));
    }

    if buckets.windows(2).any(|pair| pair[0] >= pair[1]) {
        return Err(ConfigError::InvalidBuckets(
            "buckets must be strictly increasing".to_string(),
        ));
    }

    Ok(buckets)
}

/// `[a-zA-Z_][a-zA-Z0-9_]*`
fn is_valid_metric_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Invalid histogram buckets: {0}")]
    InvalidBuckets(String),
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = ServiceConfig::from_lookup(|_| None).unwrap();

        assert_eq!(config, ServiceConfig::default());
        assert_eq!(config.metrics.buckets, prometheus::DEFAULT_BUCKETS.to_vec());
        assert_eq!(config.log.filter, "info");
        assert_eq!(config.log.format, LogFormat::Pretty);
    }

    #[test]
    fn test_reads_every_key() {
        let config = ServiceConfig::from_lookup(lookup_from(&[
            (ENV_METRICS_NAMESPACE, "tally"),
            (ENV_HISTOGRAM_BUCKETS, "0.001, 0.01,0.1 ,1"),
            (ENV_LOG_FILTER, "tally_service=debug,warn"),
            (ENV_LOG_FORMAT, "Compact"),
        ]))
        .unwrap();

        assert_eq!(config.metrics.namespace.as_deref(), Some("tally"));
        assert_eq!(config.metrics.buckets, vec![0.001, 0.01, 0.1, 1.0]);
        assert_eq!(config.log.filter, "tally_service=debug,warn");
        assert_eq!(config.log.format, LogFormat::Compact);
    }

    #[test]
    fn test_empty_namespace_means_none() {
        let config =
            ServiceConfig::from_lookup(lookup_from(&[(ENV_METRICS_NAMESPACE, "")])).unwrap();
        assert_eq!(config.metrics.namespace, None);
    }

    #[test]
    fn test_rejects_bad_namespace() {
        for bad in ["9lives", "has-dash", "sp ace"] {
            let err = ServiceConfig::from_lookup(lookup_from(&[(ENV_METRICS_NAMESPACE, bad)]))
                .unwrap_err();
            assert!(matches!(err, ConfigError::InvalidValue(ref key) if key == ENV_METRICS_NAMESPACE));
        }
    }

    #[test]
    fn test_rejects_bad_buckets() {
        let err = ServiceConfig::from_lookup(lookup_from(&[(ENV_HISTOGRAM_BUCKETS, "0.1,abc")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));

        for bad in ["", " , ", "1,0.5", "0.1,0.1", "0.1,inf"] {
            let err = ServiceConfig::from_lookup(lookup_from(&[(ENV_HISTOGRAM_BUCKETS, bad)]))
                .unwrap_err();
            assert!(matches!(err, ConfigError::InvalidBuckets(_)), "{}", bad);
        }
    }

    #[test]
    fn test_rejects_bad_log_format() {
        let err = ServiceConfig::from_lookup(lookup_from(&[(ENV_LOG_FORMAT, "json")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref key) if key == ENV_LOG_FORMAT));
    }

    #[test]
    fn test_log_filter_is_kept_verbatim() {
        // Directives are parsed once, by init_tracing.
        let config =
            ServiceConfig::from_lookup(lookup_from(&[(ENV_LOG_FILTER, "app=loudest")])).unwrap();
        assert_eq!(config.log.filter, "app=loudest");
    }
}
