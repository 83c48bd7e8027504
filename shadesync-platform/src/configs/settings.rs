use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Bridge session endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bridge {
    pub host: String,
    pub key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logger {
    pub level: String,
}

impl Default for Logger {
    fn default() -> Self {
        Self {
            level: String::from("info"),
        }
    }
}

/// Tunables of the device state coordinator. Both intervals evolved across
/// deployments, so they are configuration rather than constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coordinator {
    /// Minimum interval between device status fetches, in milliseconds.
    #[serde(default = "default_staleness_ms")]
    pub staleness_ms: u64,
    /// How long an unreached target stays trusted over device-reported
    /// position once status refreshes stop arriving, in milliseconds.
    #[serde(default = "default_reconcile_window_ms")]
    pub reconcile_window_ms: u64,
}

fn default_staleness_ms() -> u64 {
    500
}

fn default_reconcile_window_ms() -> u64 {
    30_000
}

impl Default for Coordinator {
    fn default() -> Self {
        Self {
            staleness_ms: default_staleness_ms(),
            reconcile_window_ms: default_reconcile_window_ms(),
        }
    }
}

impl Coordinator {
    pub fn staleness(&self) -> Duration {
        Duration::from_millis(self.staleness_ms)
    }

    pub fn reconcile_window(&self) -> Duration {
        Duration::from_millis(self.reconcile_window_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub bridge: Bridge,
    #[serde(default)]
    pub coordinator: Coordinator,
    #[serde(default)]
    pub logger: Logger,
}

impl Settings {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied() {
        let settings = Settings::from_toml(
            r#"
            [bridge]
            host = "192.168.1.100"
            key = "0123456789abcdef"
            "#,
        )
        .unwrap();

        assert_eq!(settings.coordinator.staleness(), Duration::from_millis(500));
        assert_eq!(
            settings.coordinator.reconcile_window(),
            Duration::from_secs(30)
        );
        assert_eq!(settings.logger.level, "info");
    }

    #[test]
    fn test_overrides_win() {
        let settings = Settings::from_toml(
            r#"
            [bridge]
            host = "10.0.0.7"
            key = "secret"

            [coordinator]
            staleness_ms = 1000
            reconcile_window_ms = 45000

            [logger]
            level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(settings.coordinator.staleness(), Duration::from_millis(1000));
        assert_eq!(
            settings.coordinator.reconcile_window(),
            Duration::from_secs(45)
        );
        assert_eq!(settings.logger.level, "debug");
    }

    #[test]
    fn test_missing_bridge_section_rejected() {
        assert!(Settings::from_toml("[logger]\nlevel = \"info\"").is_err());
    }
}
