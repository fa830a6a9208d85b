//! Configuration for the retention background task.

use lendery_core::{ConfigError, LenderyResult};
use std::time::Duration;

/// Default interval between conversation retention sweeps (1 hour).
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 3600;

/// Default interval between expired-reservation purges (24 hours).
pub const DEFAULT_PURGE_INTERVAL_SECS: u64 = 86_400;

/// Configuration for the retention background task.
#[derive(Debug, Clone)]
pub struct RetentionConfig {
    /// How often the conversation retention sweeps run (default: 1 hour)
    pub sweep_interval: Duration,

    /// How often expired reservation requests are purged (default: 24 hours)
    pub purge_interval: Duration,

    /// Whether to log each completed sweep report (default: true)
    pub log_reports: bool,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            sweep_interval: Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS),
            purge_interval: Duration::from_secs(DEFAULT_PURGE_INTERVAL_SECS),
            log_reports: true,
        }
    }
}

impl RetentionConfig {
    /// Create a RetentionConfig from environment variables.
    ///
    /// # Environment Variables
    /// - `LENDERY_RETENTION_SWEEP_INTERVAL_SECS`: Conversation sweep interval (default: 3600)
    /// - `LENDERY_RETENTION_PURGE_INTERVAL_SECS`: Purge interval (default: 86400)
    /// - `LENDERY_RETENTION_LOG_REPORTS`: Whether to log sweep reports (default: true)
    pub fn from_env() -> Self {
        let sweep_interval = Duration::from_secs(
            std::env::var("LENDERY_RETENTION_SWEEP_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_SWEEP_INTERVAL_SECS),
        );

        let purge_interval = Duration::from_secs(
            std::env::var("LENDERY_RETENTION_PURGE_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_PURGE_INTERVAL_SECS),
        );

        let log_reports = std::env::var("LENDERY_RETENTION_LOG_REPORTS")
            .ok()
            .map(|s| s.to_lowercase() != "false")
            .unwrap_or(true);

        Self {
            sweep_interval,
            purge_interval,
            log_reports,
        }
    }

    /// Create a configuration for development/testing with short intervals.
    pub fn development() -> Self {
        Self {
            sweep_interval: Duration::from_secs(30),
            purge_interval: Duration::from_secs(120),
            log_reports: true,
        }
    }

    /// Create a configuration for production.
    pub fn production() -> Self {
        Self {
            sweep_interval: Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS),
            purge_interval: Duration::from_secs(DEFAULT_PURGE_INTERVAL_SECS),
            log_reports: true,
        }
    }

    /// Validate the configuration.
    /// Returns Ok(()) if valid, Err(ConfigError::InvalidValue) otherwise.
    pub fn validate(&self) -> LenderyResult<()> {
        if self.sweep_interval.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "sweep_interval".to_string(),
                value: format!("{:?}", self.sweep_interval),
                reason: "sweep_interval must be positive".to_string(),
            }
            .into());
        }

        if self.purge_interval.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "purge_interval".to_string(),
                value: format!("{:?}", self.purge_interval),
                reason: "purge_interval must be positive".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use lendery_core::LenderyError;

    #[test]
    fn test_config_default() {
        let config = RetentionConfig::default();
        assert_eq!(
            config.sweep_interval,
            Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS)
        );
        assert_eq!(
            config.purge_interval,
            Duration::from_secs(DEFAULT_PURGE_INTERVAL_SECS)
        );
        assert!(config.log_reports);
    }

    #[test]
    fn test_config_development() {
        let config = RetentionConfig::development();
        assert_eq!(config.sweep_interval, Duration::from_secs(30));
        assert_eq!(config.purge_interval, Duration::from_secs(120));
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Without environment variables set, should use defaults
        let config = RetentionConfig::from_env();
        assert_eq!(
            config.sweep_interval,
            Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS)
        );
        assert_eq!(
            config.purge_interval,
            Duration::from_secs(DEFAULT_PURGE_INTERVAL_SECS)
        );
        assert!(config.log_reports);
    }

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(RetentionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_sweep_interval() {
        let config = RetentionConfig {
            sweep_interval: Duration::ZERO,
            ..RetentionConfig::default()
        };
        let result = config.validate();
        assert!(matches!(
            result,
            Err(LenderyError::Config(ConfigError::InvalidValue { field, .. })) if field == "sweep_interval"
        ));
    }

    #[test]
    fn test_validate_rejects_zero_purge_interval() {
        let config = RetentionConfig {
            purge_interval: Duration::ZERO,
            ..RetentionConfig::default()
        };
        let result = config.validate();
        assert!(matches!(
            result,
            Err(LenderyError::Config(ConfigError::InvalidValue { field, .. })) if field == "purge_interval"
        ));
    }
}
