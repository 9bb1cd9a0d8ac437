//! Session configuration

use std::fmt;
use std::time::Duration;

use poise_core::{PoiseError, PoiseResult};
use poise_window::WINDOW_LENGTH;

/// Analysis session configuration
#[derive(Clone, Debug, PartialEq)]
pub struct SessionConfig {
    /// Trailing span of frames kept for aggregation
    pub window: Duration,
    /// Period between cycle summaries
    pub summary_interval: Duration,
    /// Period of the elapsed-time clock
    pub clock_interval: Duration,
    /// File name prefix for exported documents
    pub export_prefix: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            window: WINDOW_LENGTH,
            summary_interval: Duration::from_secs(10),
            clock_interval: Duration::from_secs(1),
            export_prefix: "poise-analysis".to_string(),
        }
    }
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set window length
    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    /// Set summary period
    pub fn with_summary_interval(mut self, interval: Duration) -> Self {
        self.summary_interval = interval;
        self
    }

    /// Set clock period
    pub fn with_clock_interval(mut self, interval: Duration) -> Self {
        self.clock_interval = interval;
        self
    }

    /// Set export file prefix
    pub fn with_export_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.export_prefix = prefix.into();
        self
    }

    /// Check that every period is non-zero and the prefix is a plain file name
    pub fn validate(&self) -> PoiseResult<()> {
        for (name, value) in [
            ("window", self.window),
            ("summary_interval", self.summary_interval),
            ("clock_interval", self.clock_interval),
        ] {
            if value.is_zero() {
                return Err(PoiseError::InvalidConfig(format!("{name} must be non-zero")));
            }
        }

        if self.export_prefix.is_empty() || self.export_prefix.contains(['/', '\\']) {
            return Err(PoiseError::InvalidConfig(format!(
                "export prefix {:?} is not a plain file name",
                self.export_prefix
            )));
        }

        Ok(())
    }
}

impl fmt::Display for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "window={} summary={} clock={} prefix={}",
            humantime::format_duration(self.window),
            humantime::format_duration(self.summary_interval),
            humantime::format_duration(self.clock_interval),
            self.export_prefix
        )
    }
}

/// Parse a human duration such as `10s` or `1m 30s`
pub fn parse_duration(value: &str) -> PoiseResult<Duration> {
    humantime::parse_duration(value)
        .map_err(|e| PoiseError::InvalidConfig(format!("bad duration {value:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SessionConfig::default();

        assert_eq!(config.window, Duration::from_secs(10));
        assert_eq!(config.summary_interval, Duration::from_secs(10));
        assert_eq!(config.clock_interval, Duration::from_secs(1));
        assert_eq!(config.export_prefix, "poise-analysis");
        assert!(config.validate().is_ok());
        assert_eq!(
            config.to_string(),
            "window=10s summary=10s clock=1s prefix=poise-analysis"
        );
    }

    #[test]
    fn test_builder() {
        let config = SessionConfig::new()
            .with_window(Duration::from_secs(5))
            .with_summary_interval(Duration::from_secs(2))
            .with_clock_interval(Duration::from_millis(500))
            .with_export_prefix("run");

        assert_eq!(config.window, Duration::from_secs(5));
        assert_eq!(config.summary_interval, Duration::from_secs(2));
        assert_eq!(config.clock_interval, Duration::from_millis(500));
        assert_eq!(config.export_prefix, "run");
    }

    #[test]
    fn test_validate_rejects_zero_and_paths() {
        let zero = SessionConfig::new().with_summary_interval(Duration::ZERO);
        assert!(matches!(zero.validate(), Err(PoiseError::InvalidConfig(_))));

        let nested = SessionConfig::new().with_export_prefix("out/run");
        assert!(nested.validate().is_err());

        let empty = SessionConfig::new().with_export_prefix("");
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("10s").unwrap(), Duration::from_secs(10));
        assert_eq!(parse_duration("1m 30s").unwrap(), Duration::from_secs(90));
        assert_eq!(parse_duration("250ms").unwrap(), Duration::from_millis(250));
        assert!(parse_duration("soon").is_err());
    }
}
